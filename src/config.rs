use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_BATCH_SIZE, DEFAULT_MAX_RETRY_ATTEMPTS,
    DEFAULT_SLOW_PAGE_PAUSE, DEFAULT_SLOW_PAGE_THRESHOLD,
};
use crate::error::{EtlError, Result};
use crate::fetcher::SlowPagePolicy;
use crate::retry::RetryPolicy;

/// Runtime configuration for one ETL run. Values come from `config.toml`
/// when present, with defaults for anything unspecified; the base URL can
/// also be overridden via the `ANIMAL_ETL_API_URL` environment variable.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the animals API, e.g. `http://localhost:3123/animals/v1`.
    pub api_url: String,
    /// Records per outgoing batch.
    pub batch_size: usize,
    /// Total attempts per request (initial try + retries).
    pub max_retry_attempts: u32,
    /// Page round trips slower than this trigger the inter-page pause.
    pub slow_page_threshold_secs: u64,
    /// Length of the inter-page pause.
    pub slow_page_pause_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_retry_attempts: DEFAULT_MAX_RETRY_ATTEMPTS,
            slow_page_threshold_secs: DEFAULT_SLOW_PAGE_THRESHOLD.as_secs(),
            slow_page_pause_secs: DEFAULT_SLOW_PAGE_PAUSE.as_secs(),
        }
    }
}

impl Config {
    /// Load configuration from `config.toml` in the working directory,
    /// falling back to defaults when the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                EtlError::Config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            toml::from_str(&content)?
        } else {
            debug!("No config file at '{}', using defaults", path.display());
            Config::default()
        };

        if let Ok(url) = std::env::var("ANIMAL_ETL_API_URL") {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }

        if config.batch_size == 0 {
            return Err(EtlError::Config("batch_size must be at least 1".into()));
        }
        if config.max_retry_attempts == 0 {
            return Err(EtlError::Config(
                "max_retry_attempts must be at least 1".into(),
            ));
        }

        Ok(config)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default().with_max_attempts(self.max_retry_attempts)
    }

    pub fn slow_page_policy(&self) -> SlowPagePolicy {
        SlowPagePolicy {
            threshold: Duration::from_secs(self.slow_page_threshold_secs),
            pause: Duration::from_secs(self.slow_page_pause_secs),
        }
    }
}
