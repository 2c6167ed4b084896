//! Errors raised while fetching and decoding artifact data

use thiserror::Error;

/// Failure of the single fetch/decode operation behind a browser activation
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("record {index}: value for '{key}' is not a scalar")]
    InvalidRecord { index: usize, key: String },

    #[error("request cancelled")]
    Cancelled,
}

/// Format backend errors into short messages suitable for a status line
pub fn format_browser_error(err: &BrowserError) -> String {
    match err {
        BrowserError::Http(e) if e.is_timeout() => {
            "Request timed out - check connection".to_string()
        }
        BrowserError::Http(e) if e.is_connect() => {
            "Connection failed - check endpoint".to_string()
        }
        BrowserError::Status { status: 401, .. } | BrowserError::Status { status: 403, .. } => {
            "Access denied - check user id".to_string()
        }
        BrowserError::Status { status: 404, .. } => "Artifact not found".to_string(),
        other => {
            let msg = other.to_string();
            // Long bodies don't fit in the dialog
            if msg.chars().count() > 80 {
                let cut: String = msg.chars().take(80).collect();
                format!("{}...", cut)
            } else {
                msg
            }
        }
    }
}
