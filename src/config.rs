//! Configuration types for scorecard-dl
//!
//! Settings are layered: built-in defaults, then an optional JSON config file,
//! then the environment (`DATA_GOV_KEY`, after loading `.env`), then CLI flags.
//! Running with nothing but the API key in the environment reproduces the
//! classic behavior: the public API root, two output files in the working
//! directory and a 100 ms pause between page requests.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Public College Scorecard endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.data.gov/ed/collegescorecard/v1/schools";

/// Environment variable holding the api.data.gov key
pub const API_KEY_ENV: &str = "DATA_GOV_KEY";

/// Policy used to space out page requests
///
/// Serialized with a `policy` tag, e.g. `{"policy": "fixed_delay", "delay_ms": 250}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum RateLimitConfig {
    /// Wait a fixed interval between consecutive requests
    FixedDelay {
        /// Minimum spacing between two requests (default: 100 ms)
        #[serde(rename = "delay_ms", with = "duration_ms_serde")]
        delay: Duration,
    },
    /// Token bucket: sustained rate with a burst allowance
    TokenBucket {
        /// Sustained request rate
        requests_per_second: f64,
        /// Requests that may be issued back to back before throttling kicks in
        #[serde(default = "default_burst")]
        burst: u32,
    },
    /// No pacing at all. Only meant for tests against a local server.
    None,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        RateLimitConfig::FixedDelay {
            delay: default_request_delay(),
        }
    }
}

/// Main configuration for a scorecard download run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// API root queried for metadata and pages
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// api.data.gov key. Never written back out when the config is serialized.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Destination of the raw JSON dump (default: "college_scorecard.json")
    #[serde(default = "default_json_output")]
    pub json_output: PathBuf,

    /// Destination of the classification CSV
    /// (default: "college_scorecard_carnegie_basic.csv")
    #[serde(default = "default_csv_output")]
    pub csv_output: PathBuf,

    /// Per-request timeout (default: 60 s)
    #[serde(
        default = "default_request_timeout",
        rename = "request_timeout_ms",
        with = "duration_ms_serde"
    )]
    pub request_timeout: Duration,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Pacing between page requests
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Draw a terminal progress bar while paging (default: true)
    ///
    /// Only an explicit `false` turns it off; indicatif draws nothing when
    /// stderr is not a terminal.
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            json_output: default_json_output(),
            csv_output: default_csv_output(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
            rate_limit: RateLimitConfig::default(),
            show_progress: default_show_progress(),
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file; absent fields take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read config file '{}': {}", path.display(), e),
            key: None,
        })?;
        serde_json::from_str(&content).map_err(|e| Error::Config {
            message: format!("invalid config file '{}': {}", path.display(), e),
            key: None,
        })
    }

    /// Fill the API key from `.env` and the process environment
    ///
    /// An existing key (from a config file) is only replaced when the
    /// environment provides a non-empty one.
    pub fn apply_env(&mut self) {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Same as [`Config::apply_env`] with an injectable variable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
    }

    /// Check the configuration for values that cannot produce a working run
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::config("base_url", "base URL must not be empty"));
        }
        url::Url::parse(&self.base_url).map_err(|e| {
            Error::config("base_url", format!("invalid base URL '{}': {}", self.base_url, e))
        })?;

        if self.json_output == self.csv_output {
            return Err(Error::config(
                "csv_output",
                format!(
                    "JSON and CSV outputs must differ (both are '{}')",
                    self.json_output.display()
                ),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::config(
                "request_timeout_ms",
                "request timeout must be greater than zero",
            ));
        }

        if let RateLimitConfig::TokenBucket {
            requests_per_second,
            burst,
        } = &self.rate_limit
        {
            if !requests_per_second.is_finite() || *requests_per_second <= 0.0 {
                return Err(Error::config(
                    "rate_limit.requests_per_second",
                    format!("must be a positive number, got {requests_per_second}"),
                ));
            }
            if *burst == 0 {
                return Err(Error::config("rate_limit.burst", "burst must be at least 1"));
            }
        }

        Ok(())
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_json_output() -> PathBuf {
    PathBuf::from("college_scorecard.json")
}

fn default_csv_output() -> PathBuf {
    PathBuf::from("college_scorecard_carnegie_basic.csv")
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_request_delay() -> Duration {
    Duration::from_millis(100)
}

fn default_user_agent() -> String {
    concat!("scorecard-dl/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_burst() -> u32 {
    1
}

fn default_show_progress() -> bool {
    true
}

// Durations are written as integer milliseconds
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
