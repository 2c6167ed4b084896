use crate::artifact::NormalizedRow;
use crate::browser::{BrowserHandle, BrowserState};
use crossterm::event::KeyCode;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::BTreeSet;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Filter,
    Help,
    Error,
}

pub struct App {
    pub handle: BrowserHandle,
    pub state: BrowserState,
    pub mode: Mode,

    /// Cursor position within `filtered`
    pub selected: usize,
    /// Indices into `state.rows` toggled by the user
    pub selected_rows: BTreeSet<usize>,

    pub filter_text: String,
    /// Indices into `state.rows` that pass the filter, in row order
    pub filtered: Vec<usize>,
    pub fuzzy_matcher: SkimMatcherV2,

    pub last_key_press: Option<(KeyCode, Instant)>,
}

impl App {
    pub fn new(handle: BrowserHandle) -> Self {
        let state = handle.state();
        let mut app = Self {
            handle,
            state,
            mode: Mode::Normal,
            selected: 0,
            selected_rows: BTreeSet::new(),
            filter_text: String::new(),
            filtered: Vec::new(),
            fuzzy_matcher: SkimMatcherV2::default(),
            last_key_press: None,
        };
        app.apply_filter();
        app
    }

    /// Pick up state published by the browser since the last tick
    pub fn tick(&mut self) {
        if let Some(state) = self.handle.poll() {
            self.set_state(state);
        }
    }

    pub fn set_state(&mut self, state: BrowserState) {
        let finished = self.state.is_loading && !state.is_loading;
        if state.rows != self.state.rows {
            self.selected_rows.clear();
        }
        self.state = state;
        self.apply_filter();

        if finished && self.state.failed() && self.mode == Mode::Normal {
            self.mode = Mode::Error;
        }
    }

    pub fn reload(&mut self) {
        self.handle.reload();
        self.set_state(self.handle.state());
    }

    // Navigation

    pub fn next(&mut self) {
        if !self.filtered.is_empty() {
            self.selected = (self.selected + 1).min(self.filtered.len() - 1);
        }
    }

    pub fn previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn go_to_top(&mut self) {
        self.selected = 0;
    }

    pub fn go_to_bottom(&mut self) {
        self.selected = self.filtered.len().saturating_sub(1);
    }

    pub fn page_down(&mut self, size: usize) {
        if !self.filtered.is_empty() {
            self.selected = (self.selected + size).min(self.filtered.len() - 1);
        }
    }

    pub fn page_up(&mut self, size: usize) {
        self.selected = self.selected.saturating_sub(size);
    }

    // Rows and selection

    /// Index into `state.rows` under the cursor
    pub fn cursor_row(&self) -> Option<usize> {
        self.filtered.get(self.selected).copied()
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = (usize, &NormalizedRow)> {
        self.filtered.iter().map(|&i| (i, &self.state.rows[i]))
    }

    pub fn toggle_selection(&mut self) {
        if let Some(index) = self.cursor_row() {
            if !self.selected_rows.remove(&index) {
                self.selected_rows.insert(index);
            }
        }
    }

    pub fn selected_row_data(&self) -> Vec<&NormalizedRow> {
        self.selected_rows
            .iter()
            .filter_map(|&i| self.state.rows.get(i))
            .collect()
    }

    /// Cell text for a column; missing cells render empty
    pub fn cell<'a>(row: &'a NormalizedRow, prop: &str) -> &'a str {
        row.get(prop).map(String::as_str).unwrap_or("")
    }

    // Filtering

    pub fn start_filter(&mut self) {
        self.mode = Mode::Filter;
    }

    pub fn apply_filter(&mut self) {
        let query = self.filter_text.trim();
        self.filtered = if query.is_empty() {
            (0..self.state.rows.len()).collect()
        } else {
            self.state
                .rows
                .iter()
                .enumerate()
                .filter(|(_, row)| {
                    self.state.columns.iter().any(|col| {
                        self.fuzzy_matcher
                            .fuzzy_match(Self::cell(row, &col.prop), query)
                            .is_some()
                    })
                })
                .map(|(i, _)| i)
                .collect()
        };

        if self.selected >= self.filtered.len() {
            self.selected = self.filtered.len().saturating_sub(1);
        }
    }

    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.apply_filter();
        if self.mode == Mode::Filter {
            self.mode = Mode::Normal;
        }
    }

    // Modes

    pub fn enter_help_mode(&mut self) {
        self.mode = Mode::Help;
    }

    pub fn exit_mode(&mut self) {
        self.mode = Mode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{ArtifactSource, GabRequest, PathAndName, RawRecord, ServerResponse};
    use crate::browser::{ArtifactBrowser, BrowserConfig};
    use crate::error::BrowserError;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Rows(Vec<Vec<(&'static str, &'static str)>>);

    #[async_trait]
    impl ArtifactSource for Rows {
        async fn fetch_artifact(&self, _: &GabRequest) -> Result<ServerResponse, BrowserError> {
            let data = self
                .0
                .iter()
                .map(|pairs| {
                    pairs
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect::<RawRecord>()
                })
                .collect();
            Ok(ServerResponse::new(data))
        }
    }

    struct Failing;

    #[async_trait]
    impl ArtifactSource for Failing {
        async fn fetch_artifact(&self, _: &GabRequest) -> Result<ServerResponse, BrowserError> {
            Err(BrowserError::Status {
                status: 404,
                body: String::new(),
            })
        }
    }

    async fn ready_app(source: Arc<dyn ArtifactSource>) -> App {
        let config = BrowserConfig::new(
            vec![
                PathAndName::new("vnf.name", "Name"),
                PathAndName::new("event.severity", "Severity"),
            ],
            "a",
            "r",
        );
        let mut handle = ArtifactBrowser::new(source, config).spawn();
        let state = handle.wait_ready().await;
        let mut app = App::new(handle);
        app.set_state(state);
        app
    }

    fn sample() -> Arc<dyn ArtifactSource> {
        Arc::new(Rows(vec![
            vec![("vnf.name", "alpha"), ("event.severity", "MAJOR")],
            vec![("vnf.name", "beta"), ("event.severity", "MINOR")],
            vec![("vnf.name", "gamma")],
        ]))
    }

    #[tokio::test]
    async fn test_navigation_is_clamped() {
        let mut app = ready_app(sample()).await;
        assert_eq!(app.filtered, vec![0, 1, 2]);

        app.previous();
        assert_eq!(app.selected, 0);
        app.page_down(10);
        assert_eq!(app.selected, 2);
        app.next();
        assert_eq!(app.selected, 2);
        app.go_to_top();
        assert_eq!(app.cursor_row(), Some(0));
    }

    #[tokio::test]
    async fn test_filter_matches_any_cell() {
        let mut app = ready_app(sample()).await;

        app.filter_text = "minr".to_string();
        app.apply_filter();
        assert_eq!(app.filtered, vec![1]);

        app.filter_text = "zzzz".to_string();
        app.apply_filter();
        assert!(app.filtered.is_empty());
        assert_eq!(app.cursor_row(), None);

        app.clear_filter();
        assert_eq!(app.filtered.len(), 3);
    }

    #[tokio::test]
    async fn test_toggle_selection() {
        let mut app = ready_app(sample()).await;
        app.next();
        app.toggle_selection();
        app.go_to_bottom();
        app.toggle_selection();

        let selected = app.selected_row_data();
        assert_eq!(selected.len(), 2);
        assert_eq!(App::cell(selected[0], "col1"), "beta");
        assert_eq!(App::cell(selected[1], "col2"), "");

        app.toggle_selection();
        assert_eq!(app.selected_rows.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_load_opens_error_dialog() {
        let config = BrowserConfig::new(vec![PathAndName::new("a", "A")], "a", "r");
        let handle = ArtifactBrowser::new(Arc::new(Failing), config).spawn();
        let mut app = App::new(handle);
        assert!(app.state.is_loading);

        let state = app.handle.wait_ready().await;
        app.set_state(state);

        assert_eq!(app.mode, Mode::Error);
        assert!(app.state.ready);
        assert!(app.filtered.is_empty());
        assert_eq!(app.state.last_error.as_deref(), Some("Artifact not found"));
    }
}
