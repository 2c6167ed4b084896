//! Settings loaded from a YAML file and overridden from the command line

use crate::artifact::PathAndName;
use crate::browser::BrowserConfig;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Raw settings as they appear in the config file; every field is optional so
/// the file and the command line can each supply part of them
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// API root of the catalog backend
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub artifact_id: Option<String>,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub paths_and_names: Vec<PathAndName>,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub endpoint: String,
    pub user_id: Option<String>,
    pub timeout: Duration,
    pub browser: BrowserConfig,
}

impl Settings {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Invalid settings file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Overlay `overrides` on top of these settings.
    ///
    /// Scalar fields are replaced when set; a non-empty column list replaces
    /// the whole list rather than appending to it.
    pub fn merge(mut self, overrides: Settings) -> Self {
        if overrides.endpoint.is_some() {
            self.endpoint = overrides.endpoint;
        }
        if overrides.user_id.is_some() {
            self.user_id = overrides.user_id;
        }
        if overrides.timeout_secs.is_some() {
            self.timeout_secs = overrides.timeout_secs;
        }
        if overrides.artifact_id.is_some() {
            self.artifact_id = overrides.artifact_id;
        }
        if overrides.resource_id.is_some() {
            self.resource_id = overrides.resource_id;
        }
        if !overrides.paths_and_names.is_empty() {
            self.paths_and_names = overrides.paths_and_names;
        }
        self
    }

    pub fn resolve(self) -> Result<ResolvedSettings> {
        let Some(endpoint) = self.endpoint.filter(|e| !e.trim().is_empty()) else {
            bail!("No endpoint configured (use --endpoint or 'endpoint' in the settings file)");
        };
        let Some(artifact_id) = self.artifact_id.filter(|a| !a.is_empty()) else {
            bail!("No artifact id configured");
        };
        let Some(resource_id) = self.resource_id.filter(|r| !r.is_empty()) else {
            bail!("No resource id configured");
        };
        if self.paths_and_names.is_empty() {
            bail!("No columns configured (use --column path=Name or 'paths_and_names')");
        }

        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }

        Ok(ResolvedSettings {
            endpoint,
            user_id: self.user_id.filter(|u| !u.is_empty()),
            timeout: Duration::from_secs(timeout_secs),
            browser: BrowserConfig::new(self.paths_and_names, artifact_id, resource_id),
        })
    }
}
