use async_trait::async_trait;
use gab::artifact::{ArtifactSource, GabRequest, PathAndName, RawRecord, ServerResponse};
use gab::browser::{ArtifactBrowser, BrowserConfig, BrowserState};
use gab::error::BrowserError;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Source that waits before answering and records what happened
struct SlowSource {
    delay: Duration,
    fail: bool,
    started: AtomicBool,
    finished: AtomicBool,
    calls: AtomicUsize,
}

impl SlowSource {
    fn new(delay: Duration, fail: bool) -> Arc<Self> {
        Arc::new(Self {
            delay,
            fail,
            started: AtomicBool::new(false),
            finished: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ArtifactSource for SlowSource {
    async fn fetch_artifact(&self, request: &GabRequest) -> Result<ServerResponse, BrowserError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.store(true, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.finished.store(true, Ordering::SeqCst);

        if self.fail {
            return Err(BrowserError::Status {
                status: 502,
                body: "bad gateway".to_string(),
            });
        }

        let record: RawRecord = request
            .fields
            .iter()
            .map(|path| (path.clone(), format!("value of {}", path)))
            .chain([("extra".to_string(), "dropped".to_string())])
            .collect();
        Ok(ServerResponse::new(vec![record]))
    }
}

fn config() -> BrowserConfig {
    BrowserConfig::new(
        vec![PathAndName::new("a.b", "Foo"), PathAndName::new("c", "Bar")],
        "artifact-1",
        "resource-1",
    )
}

#[tokio::test]
async fn initialize_returns_ready_state() {
    let source = SlowSource::new(Duration::from_millis(1), false);
    let state = ArtifactBrowser::new(source.clone(), config()).initialize().await;

    assert!(!state.is_loading);
    assert!(state.ready);
    assert_eq!(state.columns[0].prop, "col1");
    assert_eq!(state.rows[0]["col1"], "value of a.b");
    assert_eq!(state.rows[0]["col2"], "value of c");
    assert_eq!(state.rows[0].len(), 2);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failure_ends_loading_and_leaves_grid_empty() {
    let source = SlowSource::new(Duration::from_millis(1), true);
    let state = ArtifactBrowser::new(source, config()).initialize().await;

    assert!(!state.is_loading);
    assert!(state.ready);
    assert!(state.rows.is_empty());
    assert!(state.columns.is_empty());
    assert!(state.last_error.is_some());
}

#[tokio::test]
async fn failed_reactivation_keeps_previous_rows() {
    let ok = SlowSource::new(Duration::from_millis(1), false);
    let first = ArtifactBrowser::new(ok, config()).initialize().await;

    let failing = SlowSource::new(Duration::from_millis(1), true);
    let second = ArtifactBrowser::new(failing, config())
        .activate(first.clone())
        .await;

    assert_eq!(second.rows, first.rows);
    assert!(second.ready);
    assert!(second.failed());
}

#[tokio::test]
async fn spawned_browser_starts_loading() {
    let source = SlowSource::new(Duration::from_millis(20), false);
    let mut handle = ArtifactBrowser::new(source, config()).spawn();

    let initial = handle.state();
    assert!(initial.is_loading);
    assert!(!initial.ready);
    assert!(initial.columns.is_empty());

    let done = handle.wait_ready().await;
    assert!(done.ready);
    assert_eq!(done.columns.len(), 2);
}

#[tokio::test]
async fn dropping_handle_aborts_request() {
    let source = SlowSource::new(Duration::from_millis(100), false);
    let handle = ArtifactBrowser::new(source.clone(), config()).spawn();

    // Let the task reach the fetch
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(source.started.load(Ordering::SeqCst));

    drop(handle);
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(!source.finished.load(Ordering::SeqCst));
}

#[tokio::test]
async fn poll_reports_each_change_once() {
    let source = SlowSource::new(Duration::from_millis(5), false);
    let mut handle = ArtifactBrowser::new(source, config()).spawn();

    let loading: Option<BrowserState> = handle.poll();
    assert!(loading.is_some_and(|s| s.is_loading));
    assert!(handle.poll().is_none());

    handle.wait_ready().await;
    assert!(handle.poll().is_none());
    assert!(handle.state().ready);
}
