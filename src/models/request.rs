//! Request-side value types.

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::error::{AppError, Result};

/// Layout of range bounds on the wire: `YYYYMMDDHHMM`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";

/// Reply encoding requested from the API.
pub const RESPONSE_TYPE: &str = "json";

static TIMESTAMP_SHAPE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\d{12}$").ok());

/// Inclusive notice-date range, both bounds already shape-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    start: String,
    end: String,
}

impl DateRange {
    /// Build a range from two `YYYYMMDDHHMM` strings.
    ///
    /// Fails when either bound is not a 12-digit calendar-valid timestamp or
    /// when the end precedes the start. The span itself is not capped here.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Result<Self> {
        let start = start.into().trim().to_string();
        let end = end.into().trim().to_string();

        let from = parse_timestamp(&start)?;
        let to = parse_timestamp(&end)?;
        if to < from {
            return Err(AppError::validation(format!(
                "range end {end} precedes range start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn start_time(&self) -> Result<NaiveDateTime> {
        parse_timestamp(&self.start)
    }

    pub fn end_time(&self) -> Result<NaiveDateTime> {
        parse_timestamp(&self.end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Parse a `YYYYMMDDHHMM` bound.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let shaped = TIMESTAMP_SHAPE
        .as_ref()
        .is_some_and(|shape| shape.is_match(value));
    if !shaped {
        return Err(AppError::validation(format!(
            "'{value}' is not a 12-digit YYYYMMDDHHMM timestamp"
        )));
    }
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map_err(|e| AppError::validation(format!("'{value}' is not a valid date: {e}")))
}

/// Parameters of a single remote call. Built per page and discarded after use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub base_url: String,
    pub credential: String,
    pub page_size: u32,
    pub page_number: u32,
    pub range_start: String,
    pub range_end: String,
}

impl PageRequest {
    pub fn new(
        base_url: &str,
        credential: &str,
        range: &DateRange,
        page_size: u32,
        page_number: u32,
    ) -> Self {
        Self {
            base_url: base_url.to_string(),
            credential: credential.to_string(),
            page_size,
            page_number,
            range_start: range.start().to_string(),
            range_end: range.end().to_string(),
        }
    }

    /// Query parameters in the fixed order they are sent.
    pub fn query_pairs(&self) -> [(&'static str, String); 6] {
        [
            ("numOfRows", self.page_size.to_string()),
            ("pageNo", self.page_number.to_string()),
            ("bidNtceBgnDt", self.range_start.clone()),
            ("bidNtceEndDt", self.range_end.clone()),
            ("ServiceKey", self.credential.clone()),
            ("type", RESPONSE_TYPE.to_string()),
        ]
    }
}
