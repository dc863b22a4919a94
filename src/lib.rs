//! # scorecard-dl
//!
//! Downloads the full College Scorecard dataset from api.data.gov, groups the
//! records by institution name, and writes two artifacts:
//!
//! - a raw JSON dump keyed by institution name
//! - a CSV of the Carnegie basic classification per campus
//!
//! ## Pipeline
//!
//! 1. **Probe** — one request learns `metadata.total` and `metadata.per_page`
//! 2. **Fetch** — pages `0..ceil(total / per_page)` are fetched one at a time,
//!    paced by a [`RateLimiter`](rate_limiter::RateLimiter)
//! 3. **Write** — only after every page succeeded
//!
//! Any failure aborts the run; there are no retries.
//!
//! ## Quick Start
//!
//! ```no_run
//! use scorecard_dl::{Config, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.apply_env();
//!
//!     let summary = Pipeline::new(config)?.run().await?;
//!     println!("{} institutions", summary.institutions);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Per-institution accumulators
pub mod aggregate;
/// College Scorecard HTTP client
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// JSON and CSV output
pub mod export;
/// Fetch pipeline
pub mod pipeline;
/// Page progress reporting
pub mod progress;
/// Request pacing
pub mod rate_limiter;
/// Wire schema and derived records
pub mod types;

// Re-export commonly used types
pub use aggregate::Aggregates;
pub use client::ScorecardClient;
pub use config::{Config, RateLimitConfig};
pub use error::{Error, Result};
pub use pipeline::{Pipeline, page_count};
pub use types::{CampusRow, Classification, Page, PageMetadata, RunSummary, School, SchoolResult};
