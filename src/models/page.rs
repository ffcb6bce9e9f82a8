//! Per-page and aggregate results.

use serde::Serialize;

use super::record::{Column, Record, header, renumber};

/// Envelope header and paging metadata as reported by the upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseSummary {
    pub result_code: String,
    pub result_msg: String,
    pub num_of_rows: u64,
    pub page_no: u64,
    pub total_count: u64,
}

/// Records projected from one page.
#[derive(Debug, Clone)]
pub struct PageResult {
    pub page_number: u32,
    pub records: Vec<Record>,
    /// Items on the page before filtering; a short page is the last page.
    pub raw_item_count: usize,
    pub summary: ResponseSummary,
}

/// Ordered, filtered and renumbered records spanning every fetched page.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateResult {
    summary: ResponseSummary,
    pages_fetched: usize,
    columns: Vec<Column>,
    records: Vec<Record>,
}

impl AggregateResult {
    /// Merge page results in ascending page order and renumber 1..=N.
    pub fn merge(
        summary: ResponseSummary,
        schema: &[String],
        mut pages: Vec<PageResult>,
    ) -> Self {
        pages.sort_by_key(|p| p.page_number);
        let pages_fetched = pages.len();
        let mut records: Vec<Record> = pages.into_iter().flat_map(|p| p.records).collect();
        renumber(&mut records);

        Self {
            summary,
            pages_fetched,
            columns: header(schema),
            records,
        }
    }

    pub fn summary(&self) -> &ResponseSummary {
        &self.summary
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Header row (ordinal first) for presentation and export.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
