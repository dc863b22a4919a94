//! The probe → fetch/aggregate → write pipeline
//!
//! Stages run strictly in sequence. Any error aborts the run before the
//! writer starts, so a failed fetch never produces or touches output files.

use crate::aggregate::Aggregates;
use crate::client::ScorecardClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::export;
use crate::progress::PageProgress;
use crate::rate_limiter::{self, RateLimiter};
use crate::types::{PageMetadata, RunSummary};
use tracing::{info, warn};

/// Number of pages needed to cover `metadata.total` records
///
/// # Errors
/// A zero page size cannot be paged through and is reported as a malformed
/// metadata response.
pub fn page_count(metadata: &PageMetadata) -> Result<u64> {
    if metadata.per_page == 0 {
        return Err(Error::malformed("metadata", "per_page is 0"));
    }
    Ok(metadata.total.div_ceil(metadata.per_page))
}

/// Everything the fetch stage produced
#[derive(Debug)]
pub struct FetchOutcome {
    /// Metadata reported by the probe
    pub metadata: PageMetadata,
    /// Pages fetched
    pub pages: u64,
    /// Grouped results
    pub aggregates: Aggregates,
}

/// A configured download run
pub struct Pipeline {
    config: Config,
    client: ScorecardClient,
    limiter: Box<dyn RateLimiter>,
}

impl Pipeline {
    /// Validate `config` and build the client and rate limiter it describes
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let client = ScorecardClient::new(&config)?;
        let limiter = rate_limiter::from_config(&config.rate_limit);
        Ok(Self {
            config,
            client,
            limiter,
        })
    }

    /// Replace the rate limiter built from the configuration
    #[must_use]
    pub fn with_rate_limiter(mut self, limiter: Box<dyn RateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    /// Configuration this pipeline runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Probe, fetch every page in order, and write both artifacts
    pub async fn run(&self) -> Result<RunSummary> {
        let outcome = self.fetch().await?;
        self.write(outcome)
    }

    /// Probe the API and fetch pages `0..page_count` in ascending order
    ///
    /// The first failing page aborts the whole fetch; already-fetched results
    /// are dropped.
    pub async fn fetch(&self) -> Result<FetchOutcome> {
        let metadata = self.client.probe_metadata().await?;
        let pages = page_count(&metadata)?;
        info!(
            total = metadata.total,
            per_page = metadata.per_page,
            pages,
            rate_limit = self.limiter.name(),
            "starting page fetch"
        );

        let progress = PageProgress::new(pages, self.config.show_progress);
        let mut aggregates = Aggregates::new();

        for page in 0..pages {
            self.limiter.acquire().await;
            let fetched = match self.client.fetch_page(page).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    progress.abandon();
                    warn!(page, error = %e, "page fetch failed, aborting run");
                    return Err(e);
                }
            };
            progress.page_done(page, fetched.results.len());
            aggregates.ingest_page(fetched);
        }
        progress.finish();

        if aggregates.result_count() as u64 != metadata.total {
            warn!(
                expected = metadata.total,
                received = aggregates.result_count(),
                "result count differs from metadata total"
            );
        }

        info!(
            results = aggregates.result_count(),
            institutions = aggregates.institution_count(),
            "fetch complete"
        );

        Ok(FetchOutcome {
            metadata,
            pages,
            aggregates,
        })
    }

    /// Write the JSON dump, then the classification CSV
    pub fn write(&self, outcome: FetchOutcome) -> Result<RunSummary> {
        let FetchOutcome {
            metadata,
            pages,
            aggregates,
        } = outcome;

        export::write_json(&self.config.json_output, &aggregates)?;
        export::write_csv(&self.config.csv_output, &aggregates)?;

        Ok(RunSummary {
            total_records: metadata.total,
            pages,
            results: aggregates.result_count(),
            institutions: aggregates.institution_count(),
            json_output: self.config.json_output.clone(),
            csv_output: self.config.csv_output.clone(),
        })
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn meta(total: u64, per_page: u64) -> PageMetadata {
        PageMetadata { total, per_page }
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(&meta(250, 100)).unwrap(), 3);
        assert_eq!(page_count(&meta(200, 100)).unwrap(), 2);
        assert_eq!(page_count(&meta(1, 100)).unwrap(), 1);
    }

    #[test]
    fn page_count_zero_total_is_zero_pages() {
        assert_eq!(page_count(&meta(0, 20)).unwrap(), 0);
    }

    #[test]
    fn page_count_zero_per_page_is_malformed() {
        assert!(matches!(
            page_count(&meta(10, 0)),
            Err(Error::MalformedResponse { .. })
        ));
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = Config {
            base_url: String::new(),
            ..Config::default()
        };
        assert!(matches!(Pipeline::new(config), Err(Error::Config { .. })));
    }
}
