//! Configuration of a scroll operation
//!
//! A [`ScrollConfig`] is built programmatically with [`ScrollConfig::builder`]
//! or loaded from YAML:
//!
//! ```yaml
//! base_url: https://redmine.example.com
//! api_token: 0123456789abcdef
//! logging_enabled: true
//! time_entries:
//!   user_id: "42"
//!   from: 2024-01-01
//!   to: 2024-01-31
//! retry:
//!   max_retries: 5
//!   type: exponential
//!   initial_ms: 100
//!   max_ms: 30000
//! rate_limit:
//!   requests_per_second: 5
//!   burst_size: 5
//! ```

use crate::error::{Error, Result};
use crate::http::RateLimiterConfig;
use crate::types::{BackoffType, Date};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Scroll Config
// ============================================================================

/// Connection, filtration and delivery settings shared by a scroll operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Base URL of the Redmine instance
    pub base_url: String,

    /// API key sent in the `X-Redmine-API-Key` header
    #[serde(default)]
    pub api_token: String,

    /// Log outgoing request lines and response status lines
    #[serde(default)]
    pub logging_enabled: bool,

    /// Filter applied to time entries, ignored for other collections
    #[serde(default)]
    pub time_entries: TimeEntriesFilter,

    /// Retry behavior for failed pages
    #[serde(default)]
    pub retry: RetryPolicy,

    /// Optional client-side request rate limit
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Capacity of the item and error channels
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_channel_capacity() -> usize {
    1
}

fn default_timeout() -> u64 {
    30
}

impl ScrollConfig {
    /// Create a config builder
    pub fn builder(base_url: impl Into<String>, api_token: impl Into<String>) -> ScrollConfigBuilder {
        ScrollConfigBuilder {
            config: Self {
                base_url: base_url.into(),
                api_token: api_token.into(),
                logging_enabled: false,
                time_entries: TimeEntriesFilter::default(),
                retry: RetryPolicy::default(),
                rate_limit: None,
                channel_capacity: default_channel_capacity(),
                timeout_seconds: default_timeout(),
            },
        }
    }

    /// Load a config from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config(format!("Config file '{}' not found", path.display()))
            } else {
                Error::Io(e)
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load a config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the fields a scroll cannot start without
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::missing_field("base_url"));
        }
        if self.channel_capacity == 0 {
            return Err(Error::config("channel_capacity must be at least 1"));
        }
        Ok(())
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Builder for [`ScrollConfig`]
#[derive(Debug, Clone)]
pub struct ScrollConfigBuilder {
    config: ScrollConfig,
}

impl ScrollConfigBuilder {
    /// Enable or disable request logging
    #[must_use]
    pub fn logging(mut self, enabled: bool) -> Self {
        self.config.logging_enabled = enabled;
        self
    }

    /// Set the time entries filter
    #[must_use]
    pub fn time_entries(mut self, filter: TimeEntriesFilter) -> Self {
        self.config.time_entries = filter;
        self
    }

    /// Set the retry policy
    #[must_use]
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    /// Set a client-side rate limit
    #[must_use]
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Set the channel capacity
    #[must_use]
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity;
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_seconds = timeout.as_secs();
        self
    }

    /// Build the config
    pub fn build(self) -> ScrollConfig {
        self.config
    }
}

// ============================================================================
// Time Entries Filter
// ============================================================================

/// Time entries filtration by range of dates and user id
///
/// Unset fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntriesFilter {
    /// First day of the range (`from`)
    #[serde(default)]
    pub from: Option<Date>,
    /// Last day of the range (`to`)
    #[serde(default)]
    pub to: Option<Date>,
    /// Owner of the entries (`user_id`)
    #[serde(default)]
    pub user_id: Option<String>,
}

impl TimeEntriesFilter {
    /// Create a filter for one user and a date range
    pub fn new(from: Date, to: Date, user_id: impl Into<String>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            user_id: Some(user_id.into()),
        }
    }

    /// Query parameters for this filter, in a stable order
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(user_id) = &self.user_id {
            pairs.push(("user_id", user_id.clone()));
        }
        if let Some(from) = self.from {
            pairs.push(("from", from.to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.to_string()));
        }
        pairs
    }
}

// ============================================================================
// Retry Policy
// ============================================================================

/// How the engine retries a page after a non-fatal error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries allowed per page after the first attempt (`None` = unbounded)
    #[serde(default = "default_max_retries")]
    pub max_retries: Option<u32>,

    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

#[allow(clippy::unnecessary_wraps)]
fn default_max_retries() -> Option<u32> {
    Some(5)
}

fn default_initial_ms() -> u64 {
    100
}

fn default_max_ms() -> u64 {
    30000
}

impl RetryPolicy {
    /// Retry forever without delay
    pub fn unbounded() -> Self {
        Self {
            max_retries: None,
            backoff_type: BackoffType::Constant,
            initial_ms: 0,
            max_ms: 0,
        }
    }

    /// Never retry, every error ends the scroll
    pub fn never() -> Self {
        Self {
            max_retries: Some(0),
            ..Self::default()
        }
    }

    /// Set the retry budget
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: Option<u32>) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the backoff
    #[must_use]
    pub fn with_backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.backoff_type = backoff_type;
        self.initial_ms = initial.as_millis() as u64;
        self.max_ms = max.as_millis() as u64;
        self
    }

    /// Whether another attempt is allowed after `failures` consecutive failures
    pub fn allows_retry(&self, failures: u32) -> bool {
        self.max_retries.map_or(true, |max| failures <= max)
    }

    /// Delay before retry number `attempt` (0-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        let initial = Duration::from_millis(self.initial_ms);
        let delay = match self.backoff_type {
            BackoffType::Constant => initial,
            BackoffType::Linear => initial.saturating_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                initial.saturating_mul(factor)
            }
        };

        std::cmp::min(delay, Duration::from_millis(self.max_ms))
    }
}
