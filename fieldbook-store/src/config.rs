//! Connection settings for the hosted record store.
//!
//! Settings are layered: built-in defaults, then an optional JSON file, then
//! `FIELDBOOK_*` environment variables.

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

pub const ENV_BASE_URL: &str = "FIELDBOOK_BASE_URL";
pub const ENV_PROJECT_ID: &str = "FIELDBOOK_PROJECT_ID";
pub const ENV_PUBLIC_KEY: &str = "FIELDBOOK_PUBLIC_KEY";
pub const ENV_TIMEOUT_SECS: &str = "FIELDBOOK_TIMEOUT_SECS";
pub const ENV_ASSISTANT_FUNCTION: &str = "FIELDBOOK_ASSISTANT_FUNCTION";

/// Store connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Root URL of the store's REST surface, without a trailing slash.
    pub base_url: String,
    /// Project the tables belong to.
    pub project_id: String,
    /// Public API key sent as a bearer token.
    pub public_key: String,
    /// Per-request timeout for the HTTP client.
    pub timeout_secs: u64,
    /// Page size for paged table reads.
    pub fetch_limit: u32,
    /// Hosted function backing the farm assistant chat.
    pub assistant_function: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8787".to_string(),
            project_id: String::new(),
            public_key: String::new(),
            timeout_secs: 30,
            fetch_limit: 100,
            assistant_function: "farm-assistant".to_string(),
        }
    }
}

impl StoreConfig {
    /// Reads settings from a JSON file. Missing keys keep their defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        info!(path = %path.display(), "loaded store config");
        Ok(config)
    }

    /// Defaults overlaid with the environment.
    pub fn from_env() -> StoreResult<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// The full precedence chain: defaults, then `path` if given, then the environment.
    pub fn load(path: Option<&Path>) -> StoreResult<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Overrides fields from any `FIELDBOOK_*` variables that are set and non-empty.
    pub fn apply_env(&mut self) -> StoreResult<()> {
        if let Some(url) = env_value(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(project_id) = env_value(ENV_PROJECT_ID) {
            self.project_id = project_id;
        }
        if let Some(key) = env_value(ENV_PUBLIC_KEY) {
            self.public_key = key;
        }
        if let Some(function) = env_value(ENV_ASSISTANT_FUNCTION) {
            self.assistant_function = function;
        }
        if let Some(timeout) = env_value(ENV_TIMEOUT_SECS) {
            self.timeout_secs = timeout.trim().parse().map_err(|_| {
                StoreError::Config(format!(
                    "{ENV_TIMEOUT_SECS} must be a whole number of seconds, got {timeout:?}"
                ))
            })?;
        }
        debug!(base_url = %self.base_url, "applied environment overrides");
        Ok(())
    }

    /// Checks that the settings are usable for a live connection.
    pub fn validate(&self) -> StoreResult<()> {
        if self.project_id.trim().is_empty() {
            return Err(StoreError::Config("project id is not set".to_string()));
        }
        if self.public_key.trim().is_empty() {
            return Err(StoreError::Config("public key is not set".to_string()));
        }
        if self.base_url.trim().is_empty() {
            return Err(StoreError::Config("base url is not set".to_string()));
        }
        if self.fetch_limit == 0 {
            return Err(StoreError::Config("fetch limit must be positive".to_string()));
        }
        Ok(())
    }

    /// `base_url` without trailing slashes.
    pub(crate) fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
