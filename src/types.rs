//! Core types for scorecard-dl
//!
//! Two families live here: the wire schema decoded from API responses, and the
//! derived records that flow from the aggregator into the CSV sink.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Pagination metadata reported by the API
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Total number of records across all pages
    pub total: u64,
    /// Records per page
    pub per_page: u64,
}

/// Fields of the `school` object that the pipeline reads
///
/// Only `name` is required. The classification fields are frequently null for
/// closed or non-degree-granting institutions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    /// Institution name, used as the grouping key
    pub name: String,
    /// Carnegie basic classification code, kept as whatever JSON scalar the API sent
    #[serde(default)]
    pub carnegie_basic: Option<Value>,
    /// City of the campus
    #[serde(default)]
    pub city: Option<String>,
    /// State (postal abbreviation) of the campus
    #[serde(default)]
    pub state: Option<String>,
}

/// One entry of a page's `results` array
#[derive(Clone, Debug, PartialEq)]
pub struct SchoolResult {
    /// Decoded view of `school`
    pub school: School,
    /// The result object exactly as the API returned it
    pub raw: Value,
}

/// A decoded page of results
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    /// 0-based page index this page was requested with
    pub index: u64,
    /// Results in API order
    pub results: Vec<SchoolResult>,
}

/// Reduced per-campus record kept for the CSV export
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Carnegie basic classification code
    pub carnegie_basic: Option<Value>,
    /// City of the campus
    pub city: Option<String>,
    /// State of the campus
    pub state: Option<String>,
}

impl From<&School> for Classification {
    fn from(school: &School) -> Self {
        Self {
            carnegie_basic: school.carnegie_basic.clone(),
            city: school.city.clone(),
            state: school.state.clone(),
        }
    }
}

impl Classification {
    /// Classification code rendered as a CSV cell
    ///
    /// Strings are written without quotes, numbers in their JSON form, and a
    /// null code as an empty cell.
    pub fn code_cell(&self) -> Option<String> {
        match self.carnegie_basic.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// One row of the classification CSV
///
/// Field order is the column order of the CSV header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CampusRow<'a> {
    /// Institution name
    pub institution: &'a str,
    /// City of the campus
    pub city: Option<&'a str>,
    /// State of the campus
    pub state: Option<&'a str>,
    /// Carnegie basic classification code as CSV cell text
    pub carnegie_basic: Option<String>,
    /// Position among records sharing the institution name, `None` when unique
    pub campus: Option<usize>,
}

/// Outcome of a completed run
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Record count reported by the metadata probe
    pub total_records: u64,
    /// Pages fetched
    pub pages: u64,
    /// Results actually received across all pages
    pub results: usize,
    /// Distinct institution names
    pub institutions: usize,
    /// Where the raw JSON dump was written
    pub json_output: PathBuf,
    /// Where the classification CSV was written
    pub csv_output: PathBuf,
}
