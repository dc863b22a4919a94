//! Error types for scorecard-dl
//!
//! Every stage of the pipeline fails fast: there are no retries and no partial
//! recovery, so each variant carries enough context (page index, HTTP status,
//! offending field) to explain why a run was aborted.

use thiserror::Error;

/// Result type alias for scorecard-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for scorecard-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "base_url")
        key: Option<String>,
    },

    /// Transport-level failure (DNS, connect, TLS, timeout, body read)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The metadata probe was answered with a non-success status
    #[error("metadata request failed with status {status}")]
    ProbeStatus {
        /// HTTP status code returned by the API root
        status: u16,
    },

    /// A page fetch was answered with anything other than 200 OK
    #[error("error on page {page}: {status}")]
    PageStatus {
        /// 0-based page index that failed
        page: u64,
        /// HTTP status code returned for that page
        status: u16,
    },

    /// Response body did not match the expected schema
    #[error("malformed response ({context}): {reason}")]
    MalformedResponse {
        /// Which request produced the body (e.g., "metadata", "page 3")
        context: String,
        /// What was missing or mistyped
        reason: String,
    },

    /// JSON serialization error while writing output
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a [`Error::MalformedResponse`]
    pub fn malformed(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedResponse {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`Error::Config`] tied to a configuration key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Stable machine-readable code, used as a structured log field
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Network(_) => "network_error",
            Error::ProbeStatus { .. } => "probe_status",
            Error::PageStatus { .. } => "page_status",
            Error::MalformedResponse { .. } => "malformed_response",
            Error::Serialization(_) => "serialization_error",
            Error::Csv(_) => "csv_error",
            Error::Io(_) => "io_error",
        }
    }
}
