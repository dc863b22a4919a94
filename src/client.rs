//! HTTP client for the College Scorecard API
//!
//! Two requests exist: the metadata probe (API root, no `page` parameter) and
//! the page fetch. Bodies are decoded against explicit schemas; anything that
//! does not fit is reported as [`Error::MalformedResponse`] rather than
//! surfacing later as a missing field.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{Page, PageMetadata, School, SchoolResult};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Deserialize)]
struct MetadataEnvelope {
    metadata: PageMetadata,
}

#[derive(Deserialize)]
struct PageEnvelope {
    results: Vec<Value>,
}

#[derive(Deserialize)]
struct ResultHead {
    school: School,
}

/// Client bound to one API root and key
#[derive(Clone, Debug)]
pub struct ScorecardClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ScorecardClient {
    /// Create a client from the run configuration
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {}", e),
                key: None,
            })?;

        if config.api_key.is_none() {
            warn!(
                "{} is not set; requests are sent without an api_key and will likely be rejected",
                crate::config::API_KEY_ENV
            );
        }

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Learn the total record count and page size
    ///
    /// # Errors
    /// - [`Error::Network`] on transport failure
    /// - [`Error::ProbeStatus`] on a non-success status
    /// - [`Error::MalformedResponse`] when `metadata.total` / `metadata.per_page` are missing
    pub async fn probe_metadata(&self) -> Result<PageMetadata> {
        debug!(url = %self.base_url, "probing metadata");

        let response = self.request(None).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::ProbeStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let envelope: MetadataEnvelope = serde_json::from_slice(&body)
            .map_err(|e| Error::malformed("metadata", e.to_string()))?;

        debug!(
            total = envelope.metadata.total,
            per_page = envelope.metadata.per_page,
            "metadata received"
        );
        Ok(envelope.metadata)
    }

    /// Fetch and decode one page of results
    ///
    /// # Errors
    /// - [`Error::Network`] on transport failure
    /// - [`Error::PageStatus`] on any status other than 200
    /// - [`Error::MalformedResponse`] when `results` or a result's `school.name` is missing
    pub async fn fetch_page(&self, page: u64) -> Result<Page> {
        let response = self.request(Some(page)).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::PageStatus {
                page,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        decode_page(page, &body)
    }

    fn request(&self, page: Option<u64>) -> reqwest::RequestBuilder {
        let mut query: Vec<(&str, String)> = Vec::with_capacity(2);
        if let Some(key) = &self.api_key {
            query.push(("api_key", key.clone()));
        }
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }
        self.http.get(&self.base_url).query(&query)
    }
}

/// Decode a page body into typed results, keeping each raw object intact
pub fn decode_page(page: u64, body: &[u8]) -> Result<Page> {
    let context = || format!("page {page}");

    let envelope: PageEnvelope =
        serde_json::from_slice(body).map_err(|e| Error::malformed(context(), e.to_string()))?;

    let results = envelope
        .results
        .into_iter()
        .enumerate()
        .map(|(i, raw)| -> Result<SchoolResult> {
            let head = ResultHead::deserialize(&raw)
                .map_err(|e| Error::malformed(context(), format!("result {i}: {e}")))?;
            Ok(SchoolResult {
                school: head.school,
                raw,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Page {
        index: page,
        results,
    })
}
