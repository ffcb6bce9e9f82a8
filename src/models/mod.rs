// src/models/mod.rs

//! Domain models for the collector.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod page;
mod record;
mod request;

// Re-export all public types
pub use config::{ApiConfig, CollectorConfig, Config, RetryConfig, SERVICE_KEY_ENV};
pub use page::{AggregateResult, PageResult, ResponseSummary};
pub use record::{
    BID_COLUMNS, BUDGET_KEY, CATEGORY_KEY, CURRENCY_KEYS, Column, ESTIMATED_PRICE_KEY,
    ORDINAL_KEY, PAGE_META_KEYS, Record, TITLE_KEY, default_schema, display_name, header,
    renumber,
};
pub use request::{DateRange, PageRequest, RESPONSE_TYPE, TIMESTAMP_FORMAT, parse_timestamp};
