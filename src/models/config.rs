//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable that overrides `api.service_key`.
pub const SERVICE_KEY_ENV: &str = "NARA_SERVICE_KEY";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote endpoint, credential and timeouts
    #[serde(default)]
    pub api: ApiConfig,

    /// Paging, batching and range policy
    #[serde(default)]
    pub collector: CollectorConfig,

    /// Per-page retry policy
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.api.apply_env();
        Ok(config)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            let mut config = Self::default();
            config.api.apply_env();
            config
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::validation("api.base_url is empty"));
        }
        if self.api.connect_timeout_ms == 0 || self.api.request_timeout_ms == 0 {
            return Err(AppError::validation("api timeouts must be > 0"));
        }
        if self.collector.page_size == 0 {
            return Err(AppError::validation("collector.page_size must be > 0"));
        }
        if self.collector.max_pages == 0 {
            return Err(AppError::validation("collector.max_pages must be > 0"));
        }
        if self.collector.batch_size == 0 {
            return Err(AppError::validation("collector.batch_size must be > 0"));
        }
        if self.retry.max_attempts == 0 {
            return Err(AppError::validation("retry.max_attempts must be > 0"));
        }
        if self.retry.initial_delay_ms > self.retry.max_delay_ms {
            return Err(AppError::validation(
                "retry.initial_delay_ms must not exceed retry.max_delay_ms",
            ));
        }
        Ok(())
    }
}

/// Remote endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Bid-notice listing endpoint
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Decoded service key issued by the data portal
    #[serde(default)]
    pub service_key: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// TCP connect timeout in milliseconds
    #[serde(default = "defaults::connect_timeout")]
    pub connect_timeout_ms: u64,

    /// Whole-request timeout in milliseconds
    #[serde(default = "defaults::request_timeout")]
    pub request_timeout_ms: u64,
}

impl ApiConfig {
    /// Replace the service key with `NARA_SERVICE_KEY` when it is set.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(SERVICE_KEY_ENV) {
            if !key.trim().is_empty() {
                self.service_key = key.trim().to_string();
            }
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            service_key: String::new(),
            user_agent: defaults::user_agent(),
            connect_timeout_ms: defaults::connect_timeout(),
            request_timeout_ms: defaults::request_timeout(),
        }
    }
}

/// Multi-page collection policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Rows requested per page (largest size the upstream honours)
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,

    /// Upper bound on pages fetched per query
    #[serde(default = "defaults::max_pages")]
    pub max_pages: u32,

    /// Pages fetched simultaneously in one batch
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,

    /// Pause between batches in milliseconds
    #[serde(default = "defaults::batch_delay")]
    pub batch_delay_ms: u64,

    /// Longest query range accepted by the upstream, in calendar months
    #[serde(default = "defaults::max_range_months")]
    pub max_range_months: u32,
}

impl CollectorConfig {
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::page_size(),
            max_pages: defaults::max_pages(),
            batch_size: defaults::batch_size(),
            batch_delay_ms: defaults::batch_delay(),
            max_range_months: defaults::max_range_months(),
        }
    }
}

/// Exponential backoff settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per page, including the first
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,

    /// Delay after the first failure in milliseconds
    #[serde(default = "defaults::initial_delay")]
    pub initial_delay_ms: u64,

    /// Delay cap in milliseconds
    #[serde(default = "defaults::max_delay")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::max_attempts(),
            initial_delay_ms: defaults::initial_delay(),
            max_delay_ms: defaults::max_delay(),
        }
    }
}

mod defaults {
    // Api defaults
    pub fn base_url() -> String {
        "https://apis.data.go.kr/1230000/ao/PubDataOpnStdService/getDataSetOpnStdBidPblancInfo"
            .into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; nara-collector/0.1)".into()
    }
    pub fn connect_timeout() -> u64 {
        15_000
    }
    pub fn request_timeout() -> u64 {
        30_000
    }

    // Collector defaults
    pub fn page_size() -> u32 {
        999
    }
    pub fn max_pages() -> u32 {
        500
    }
    pub fn batch_size() -> usize {
        5
    }
    pub fn batch_delay() -> u64 {
        300
    }
    pub fn max_range_months() -> u32 {
        1
    }

    // Retry defaults
    pub fn max_attempts() -> u32 {
        3
    }
    pub fn initial_delay() -> u64 {
        500
    }
    pub fn max_delay() -> u64 {
        4_000
    }
}
