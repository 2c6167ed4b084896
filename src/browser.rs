//! Artifact browser: fetch once, normalize, expose grid state
//!
//! `ArtifactBrowser::initialize` is the plain async entry point returning a
//! `BrowserState` value. `ArtifactBrowser::spawn` runs the same activation on
//! a tokio task and publishes state through a watch channel; the in-flight
//! request is aborted when the returned handle is dropped.

use crate::artifact::{
    normalize, ArtifactSource, ColumnDefinition, GabRequest, NormalizationResult, NormalizedRow,
    PathAndName,
};
use crate::error::{format_browser_error, BrowserError};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// What to browse: column definitions plus the artifact coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    pub paths_and_names: Vec<PathAndName>,
    pub artifact_id: String,
    pub resource_id: String,
}

impl BrowserConfig {
    pub fn new(
        paths_and_names: Vec<PathAndName>,
        artifact_id: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            paths_and_names,
            artifact_id: artifact_id.into(),
            resource_id: resource_id.into(),
        }
    }

    /// Lookup paths in column order
    pub fn paths(&self) -> Vec<String> {
        self.paths_and_names.iter().map(|d| d.path.clone()).collect()
    }

    pub fn request(&self) -> GabRequest {
        GabRequest::new(&self.artifact_id, &self.resource_id, self.paths())
    }
}

/// Result of the single fetch behind an activation
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(NormalizationResult),
    Failed(BrowserError),
}

/// Presentation state handed to the grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BrowserState {
    pub rows: Vec<NormalizedRow>,
    pub columns: Vec<ColumnDefinition>,
    pub is_loading: bool,
    pub ready: bool,
    /// Message of the last failed activation, if any
    pub last_error: Option<String>,
    #[serde(skip)]
    pub loaded_at: Option<DateTime<Local>>,
}

impl BrowserState {
    /// Enter the loading state.
    ///
    /// Columns are cleared; rows from a previous activation are left alone.
    pub fn begin_loading(&mut self) {
        self.ready = false;
        self.is_loading = true;
        self.columns.clear();
        self.last_error = None;
    }

    /// Apply the outcome of a fetch.
    ///
    /// A failure leaves rows and columns untouched. Either way loading ends
    /// and the state becomes ready.
    pub fn complete(&mut self, outcome: LoadOutcome) {
        match outcome {
            LoadOutcome::Loaded(result) => {
                self.rows = result.rows;
                self.columns = result.columns;
                self.loaded_at = Some(Local::now());
            }
            LoadOutcome::Failed(err) => {
                self.last_error = Some(format_browser_error(&err));
            }
        }
        self.is_loading = false;
        self.ready = true;
    }

    pub fn failed(&self) -> bool {
        self.last_error.is_some()
    }
}

/// Fetches and normalizes artifact data for one configuration
pub struct ArtifactBrowser {
    source: Arc<dyn ArtifactSource>,
    config: BrowserConfig,
}

impl ArtifactBrowser {
    pub fn new(source: Arc<dyn ArtifactSource>, config: BrowserConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Fresh activation: returns the terminal state after exactly one fetch
    pub async fn initialize(&self) -> BrowserState {
        self.activate(BrowserState::default()).await
    }

    /// Activation starting from a previous state
    pub async fn activate(&self, previous: BrowserState) -> BrowserState {
        let mut state = previous;
        state.begin_loading();
        let outcome = self.load().await;
        state.complete(outcome);
        state
    }

    /// Issue the fetch and normalize the response
    pub async fn load(&self) -> LoadOutcome {
        let request = self.config.request();
        info!(
            "Loading artifact {} of resource {} ({} columns)",
            self.config.artifact_id,
            self.config.resource_id,
            request.fields.len()
        );

        match self.source.fetch_artifact(&request).await {
            Ok(response) => {
                let result = normalize(&response.data, &self.config.paths_and_names);
                debug!(
                    "Normalized {} rows into {} columns",
                    result.rows.len(),
                    result.columns.len()
                );
                LoadOutcome::Loaded(result)
            }
            Err(e) => {
                error!("Failed to load artifact {}: {}", self.config.artifact_id, e);
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Run the activation in the background
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(self) -> BrowserHandle {
        let (tx, rx) = watch::channel(BrowserState::default());
        let mut handle = BrowserHandle {
            browser: Arc::new(self),
            tx: Arc::new(tx),
            rx,
            task: None,
            generation: Arc::new(AtomicU64::new(0)),
        };
        handle.start();
        handle
    }
}

/// Owner of a background activation
///
/// Dropping the handle aborts any request still in flight, so no state is
/// published after teardown.
pub struct BrowserHandle {
    browser: Arc<ArtifactBrowser>,
    tx: Arc<watch::Sender<BrowserState>>,
    rx: watch::Receiver<BrowserState>,
    task: Option<JoinHandle<()>>,
    /// Id of the current activation; completions from older ones are dropped
    generation: Arc<AtomicU64>,
}

impl BrowserHandle {
    fn start(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }

        // An aborted task may be mid-poll and still finish its load; its
        // result is stale once the generation moves on.
        let current = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.tx.send_modify(|state| state.begin_loading());

        let browser = Arc::clone(&self.browser);
        let tx = Arc::clone(&self.tx);
        let generation = Arc::clone(&self.generation);
        self.task = Some(tokio::spawn(async move {
            let outcome = browser.load().await;
            let published = tx.send_if_modified(|state| {
                if generation.load(Ordering::SeqCst) != current {
                    return false;
                }
                state.complete(outcome);
                true
            });
            if !published {
                debug!("Dropped result of superseded activation {}", current);
            }
        }));
    }

    pub fn config(&self) -> &BrowserConfig {
        self.browser.config()
    }

    /// Latest published state
    pub fn state(&self) -> BrowserState {
        self.rx.borrow().clone()
    }

    /// Returns the new state if it changed since the last call
    pub fn poll(&mut self) -> Option<BrowserState> {
        if self.rx.has_changed().unwrap_or(false) {
            Some(self.rx.borrow_and_update().clone())
        } else {
            None
        }
    }

    /// Wait until loading has finished and return that state
    pub async fn wait_ready(&mut self) -> BrowserState {
        if let Ok(state) = self.rx.wait_for(|state| !state.is_loading).await {
            return state.clone();
        }
        self.state()
    }

    pub fn is_in_flight(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Start a new activation with the same configuration, dropping any
    /// request still in flight
    pub fn reload(&mut self) {
        info!("Reloading artifact {}", self.browser.config.artifact_id);
        self.start();
    }

    /// Abort the in-flight request.
    ///
    /// If the request was still running, the activation completes as a
    /// cancelled failure. Returns whether anything was cancelled.
    pub async fn cancel(&mut self) -> bool {
        let Some(task) = self.task.take() else {
            return false;
        };
        task.abort();
        match task.await {
            Err(e) if e.is_cancelled() => {
                debug!("Cancelled in-flight request");
                self.tx
                    .send_modify(|state| state.complete(LoadOutcome::Failed(BrowserError::Cancelled)));
                true
            }
            _ => false,
        }
    }
}

impl Drop for BrowserHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
