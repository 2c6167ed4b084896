//! Fetch seam between the browser and the backend

use super::response::{GabRequest, ServerResponse};
use crate::error::BrowserError;
use async_trait::async_trait;

/// Anything that can answer an artifact search request
///
/// The browser issues exactly one call per activation. Implementations
/// return the decoded, validated response.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    async fn fetch_artifact(&self, request: &GabRequest) -> Result<ServerResponse, BrowserError>;
}
