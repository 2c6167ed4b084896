mod dialog;
mod help;
mod highlight;

use crate::app::{App, Mode};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

/// Width reserved for the selection marker column
const MARKER_WIDTH: u16 = 2;

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(1),    // Grid
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_main_content(f, app, chunks[1]);
    render_footer(f, app, chunks[2]);

    match app.mode {
        Mode::Help => help::render(f),
        Mode::Error => dialog::render_error(f, app),
        _ => {}
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let config = app.handle.config();
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White);

    let status = if app.state.is_loading {
        Span::styled("loading", Style::default().fg(Color::Yellow))
    } else if app.state.failed() {
        Span::styled("failed", Style::default().fg(Color::Red))
    } else if app.state.ready {
        Span::styled("ready", Style::default().fg(Color::Green))
    } else {
        Span::styled("idle", label)
    };

    let loaded_at = app
        .state
        .loaded_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    let lines = vec![
        Line::from(vec![
            Span::styled("Artifact: ", label),
            Span::styled(config.artifact_id.clone(), value),
            Span::raw("  "),
            Span::styled("Resource: ", label),
            Span::styled(config.resource_id.clone(), value),
        ]),
        Line::from(vec![
            Span::styled("Status: ", label),
            status,
            Span::raw("  "),
            Span::styled("Loaded: ", label),
            Span::styled(loaded_at, value),
        ]),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_main_content(f: &mut Frame, app: &App, area: Rect) {
    if app.mode == Mode::Filter || !app.filter_text.is_empty() {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(area);

        render_filter_bar(f, app, chunks[0]);
        render_grid(f, app, chunks[1]);
    } else {
        render_grid(f, app, area);
    }
}

fn render_filter_bar(f: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if app.mode == Mode::Filter {
        (
            format!("/{}_", app.filter_text),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            format!("/{}", app.filter_text),
            Style::default().fg(Color::DarkGray),
        )
    };
    f.render_widget(Paragraph::new(Line::from(Span::styled(text, style))), area);
}

fn grid_title(app: &App) -> String {
    let shown = app.filtered.len();
    let total = app.state.rows.len();
    let selected = if app.selected_rows.is_empty() {
        String::new()
    } else {
        format!(" sel.{}", app.selected_rows.len())
    };

    if app.filter_text.trim().is_empty() {
        format!(" Artifact[{}]{} ", total, selected)
    } else {
        format!(" Artifact[{}/{}]{} ", shown, total, selected)
    }
}

/// Render the artifact grid: header from column names, cells looked up by prop
fn render_grid(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            grid_title(app),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    if app.state.is_loading || !app.state.ready {
        let msg = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);
        f.render_widget(msg, inner_area);
        return;
    }

    let columns = &app.state.columns;
    if columns.is_empty() || app.state.rows.is_empty() {
        let text = if app.state.failed() {
            "No data (load failed, press R to retry)"
        } else {
            "No data"
        };
        let msg = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(msg, inner_area);
        return;
    }

    let column_width = (inner_area.width.saturating_sub(MARKER_WIDTH) as usize)
        .checked_div(columns.len())
        .unwrap_or(0);

    let header_cells = std::iter::once(Cell::from("")).chain(columns.iter().map(|col| {
        Cell::from(format!(" {}", col.name)).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    }));
    let header = Row::new(header_cells).height(1);

    let query = app.filter_text.trim();
    let match_style = Style::default()
        .fg(Color::LightGreen)
        .add_modifier(Modifier::BOLD);

    let rows = app.visible_rows().map(|(row_index, row)| {
        let is_marked = app.selected_rows.contains(&row_index);
        let marker = Cell::from(if is_marked { "*" } else { " " })
            .style(Style::default().fg(Color::Magenta));
        let base_style = if is_marked {
            Style::default().fg(Color::Magenta)
        } else {
            Style::default()
        };

        let cells = columns.iter().map(move |col| {
            let value = truncate_cell(App::cell(row, &col.prop), column_width.saturating_sub(2));
            if query.is_empty() {
                Cell::from(format!(" {}", value)).style(base_style)
            } else {
                highlight::fuzzy_cell(&value, query, &app.fuzzy_matcher, base_style, match_style)
            }
        });
        Row::new(std::iter::once(marker).chain(cells))
    });

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(MARKER_WIDTH))
        .chain(columns.iter().map(|_| Constraint::Ratio(1, columns.len() as u32)))
        .collect();

    let table = Table::new(rows, widths).header(header).row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default();
    state.select(Some(app.selected));

    f.render_stateful_widget(table, inner_area, &mut state);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let hint = Style::default().fg(Color::DarkGray);
    let key = Style::default().fg(Color::Green);

    let mut spans = vec![
        Span::styled(" <?>", key),
        Span::styled(" help ", hint),
        Span::styled("<R>", key),
        Span::styled(" reload ", hint),
        Span::styled("<space>", key),
        Span::styled(" select ", hint),
        Span::styled("</>", key),
        Span::styled(" filter ", hint),
        Span::styled("<q>", key),
        Span::styled(" quit", hint),
    ];
    if let Some(index) = app.cursor_row() {
        spans.push(Span::styled(
            format!("  row {}/{}", index + 1, app.state.rows.len()),
            hint,
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Shorten a cell value to `width` characters, marking the cut with "..."
fn truncate_cell(value: &str, width: usize) -> String {
    if width == 0 || value.chars().count() <= width {
        return value.to_string();
    }
    let keep = width.saturating_sub(3);
    let head: String = value.chars().take(keep).collect();
    format!("{}...", head)
}

/// Rectangle centered in `r`, sized by percentages
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    horizontal_center(percent_x, popup_layout[1])
}

/// Rectangle centered in `r` with a fixed height in lines
fn centered_rect_lines(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let y = r.y + (r.height - height) / 2;
    horizontal_center(percent_x, Rect::new(r.x, y, r.width, height))
}

fn horizontal_center(percent_x: u16, r: Rect) -> Rect {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(r)[1]
}
