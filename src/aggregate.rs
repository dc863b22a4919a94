//! Per-institution accumulation of fetched results
//!
//! [`Aggregates`] owns both accumulators. It is created empty by the fetch
//! stage, grows monotonically page by page, and is handed by value to the
//! export stage. Institutions iterate in first-seen order; records within an
//! institution keep their append order.

use crate::types::{CampusRow, Classification, Page, SchoolResult};
use indexmap::IndexMap;
use serde_json::Value;

/// Results grouped by institution name
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Aggregates {
    institutions: IndexMap<String, Vec<Value>>,
    classifications: IndexMap<String, Vec<Classification>>,
    results: usize,
}

impl Aggregates {
    /// Create empty accumulators
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every result of `page`, in API order
    pub fn ingest_page(&mut self, page: Page) {
        for result in page.results {
            self.ingest(result);
        }
    }

    /// Append a single result under its institution name
    pub fn ingest(&mut self, result: SchoolResult) {
        let SchoolResult { school, raw } = result;
        let classification = Classification::from(&school);

        self.classifications
            .entry(school.name.clone())
            .or_default()
            .push(classification);
        self.institutions.entry(school.name).or_default().push(raw);
        self.results += 1;
    }

    /// Number of distinct institution names
    pub fn institution_count(&self) -> usize {
        self.institutions.len()
    }

    /// Number of results ingested
    pub fn result_count(&self) -> usize {
        self.results
    }

    /// Whether nothing has been ingested
    pub fn is_empty(&self) -> bool {
        self.results == 0
    }

    /// Raw records grouped by institution
    pub fn institutions(&self) -> &IndexMap<String, Vec<Value>> {
        &self.institutions
    }

    /// Classification records grouped by institution
    pub fn classifications(&self) -> &IndexMap<String, Vec<Classification>> {
        &self.classifications
    }

    /// Raw records of one institution, in append order
    pub fn records_for(&self, institution: &str) -> Option<&[Value]> {
        self.institutions.get(institution).map(Vec::as_slice)
    }

    /// Flatten the classification accumulator into CSV rows
    ///
    /// Rows follow institution insertion order, then append order. `campus` is
    /// `None` when an institution has exactly one record, else its 0-based
    /// position.
    pub fn campus_rows(&self) -> impl Iterator<Item = CampusRow<'_>> + '_ {
        self.classifications
            .iter()
            .flat_map(|(institution, entries)| {
                let multi = entries.len() > 1;
                entries.iter().enumerate().map(move |(i, entry)| CampusRow {
                    institution: institution.as_str(),
                    city: entry.city.as_deref(),
                    state: entry.state.as_deref(),
                    carnegie_basic: entry.code_cell(),
                    campus: multi.then_some(i),
                })
            })
    }
}
