//! HTTP client for the catalog backend's artifact search endpoint

use crate::artifact::{ArtifactSource, GabRequest, ServerResponse};
use crate::error::BrowserError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Path of the search endpoint relative to the API root
const SEARCH_PATH: &str = "/v1/catalog/gab/searchFor";

/// Header carrying the acting user id
const USER_ID_HEADER: &str = "USER_ID";

/// Longest error body kept from a failed response
const MAX_ERROR_BODY: usize = 512;

/// Mask user identifiers for logging
fn mask_user_id(value: &str) -> String {
    let count = value.chars().count();
    if count <= 4 {
        "*".repeat(count)
    } else {
        let head: String = value.chars().take(2).collect();
        format!("{}***", head)
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

/// Artifact search client
pub struct GabHttpClient {
    http_client: Client,
    base_url: String,
    user_id: Option<String>,
}

impl GabHttpClient {
    /// Create a client for the given API root (e.g. `http://host:8181/sdc1/feProxy/rest`)
    pub fn new(
        base_url: &str,
        user_id: Option<String>,
        timeout: Duration,
    ) -> Result<Self, BrowserError> {
        debug!(
            "Creating backend client for {}, user: {:?}, timeout: {:?}",
            base_url,
            user_id.as_deref().map(mask_user_id),
            timeout
        );
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id,
        })
    }

    /// Full URL of the search endpoint
    pub fn search_url(&self) -> String {
        format!("{}{}", self.base_url, SEARCH_PATH)
    }

    /// POST the request and return the raw body of a successful response
    pub async fn search(&self, request: &GabRequest) -> Result<String, BrowserError> {
        let url = self.search_url();
        debug!(
            "Search request: artifact={}, parent={}, fields={}",
            request.artifact_unique_id,
            request.parent_id,
            request.fields.len()
        );
        trace!("Search fields: {:?}", request.fields);

        let mut builder = self.http_client.post(&url).json(request);
        if let Some(user_id) = &self.user_id {
            builder = builder.header(USER_ID_HEADER, user_id);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("Response status: {}, {} bytes", status, body.len());

        if !status.is_success() {
            warn!("Search failed with {}", status);
            return Err(BrowserError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        trace!("Response body: {}", body);
        Ok(body)
    }
}

#[async_trait]
impl ArtifactSource for GabHttpClient {
    async fn fetch_artifact(&self, request: &GabRequest) -> Result<ServerResponse, BrowserError> {
        let body = self.search(request).await?;
        ServerResponse::from_json(&body)
    }
}
