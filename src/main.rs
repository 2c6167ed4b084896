use anyhow::{Context, Result};
use clap::Parser;
use gab::app::App;
use gab::artifact::PathAndName;
use gab::backend::GabHttpClient;
use gab::browser::ArtifactBrowser;
use gab::config::{ResolvedSettings, Settings};
use gab::{event, ui};
use ratatui::DefaultTerminal;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Browse artifact metadata as a grid
#[derive(Parser, Debug)]
#[command(name = "gab", version, about)]
struct Args {
    /// YAML settings file
    #[arg(short, long, env = "GAB_CONFIG")]
    config: Option<PathBuf>,

    /// API root of the catalog backend
    #[arg(long)]
    endpoint: Option<String>,

    #[arg(long)]
    artifact_id: Option<String>,

    #[arg(long)]
    resource_id: Option<String>,

    /// Column as `path=Display Name` (repeatable, replaces configured columns)
    #[arg(short = 'C', long = "column", value_parser = parse_column)]
    columns: Vec<PathAndName>,

    /// Value of the USER_ID header
    #[arg(long, env = "GAB_USER_ID")]
    user_id: Option<String>,

    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print the normalized grid as JSON instead of starting the UI
    #[arg(long)]
    json: bool,

    /// Log file used while the UI owns the terminal
    #[arg(long, default_value = "gab.log")]
    log_file: PathBuf,
}

fn parse_column(s: &str) -> Result<PathAndName, String> {
    PathAndName::parse_pair(s).ok_or_else(|| format!("invalid column '{}', expected path=Name", s))
}

fn init_logging(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gab=info"));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        // The UI owns stdout, so logs go to a file
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&args.log_file)
            .with_context(|| format!("Failed to open log file {}", args.log_file.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
    Ok(())
}

fn load_settings(args: &Args) -> Result<ResolvedSettings> {
    let base = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let overrides = Settings {
        endpoint: args.endpoint.clone(),
        user_id: args.user_id.clone(),
        timeout_secs: args.timeout_secs,
        artifact_id: args.artifact_id.clone(),
        resource_id: args.resource_id.clone(),
        paths_and_names: args.columns.clone(),
    };
    base.merge(overrides).resolve()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let settings = load_settings(&args)?;
    info!(
        "Browsing artifact {} via {}",
        settings.browser.artifact_id, settings.endpoint
    );

    let client = GabHttpClient::new(&settings.endpoint, settings.user_id, settings.timeout)
        .context("Failed to create HTTP client")?;
    let browser = ArtifactBrowser::new(Arc::new(client), settings.browser);

    if args.json {
        run_json(browser).await
    } else {
        run_tui(browser)
    }
}

async fn run_json(browser: ArtifactBrowser) -> Result<()> {
    let state = browser.initialize().await;
    println!("{}", serde_json::to_string_pretty(&state)?);

    if let Some(err) = state.last_error {
        anyhow::bail!("Load failed: {}", err);
    }
    Ok(())
}

fn run_tui(browser: ArtifactBrowser) -> Result<()> {
    let mut app = App::new(browser.spawn());

    let mut terminal = ratatui::try_init().context("Failed to initialize terminal")?;
    let result = run_loop(&mut terminal, &mut app);
    ratatui::restore();
    result?;

    // Selected rows are handed back on stdout for piping
    let selected = app.selected_row_data();
    if !selected.is_empty() {
        println!("{}", serde_json::to_string_pretty(&selected)?);
    }
    info!("Exiting");
    Ok(())
}

fn run_loop(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| ui::render(f, app))?;
        if event::handle_events(app)? {
            return Ok(());
        }
    }
}
