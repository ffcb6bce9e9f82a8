// src/services/mod.rs

//! Fetch-normalize-filter-aggregate engine.
//!
//! - `transport`: one HTTP GET per page
//! - `envelope`: reply body to canonical header/body/items
//! - `projector`: items to schema-keyed records
//! - `filter`: optional budget/keyword/category predicates
//! - `retry`: exponential backoff
//! - `collector`: batched multi-page retrieval and merge

pub mod collector;
pub mod envelope;
pub mod filter;
pub mod projector;
pub mod retry;
pub mod transport;

pub use collector::BidCollector;
pub use envelope::{RawEnvelope, parse_envelope};
pub use filter::{FilterSet, passes_filters};
pub use projector::{project_page, project_row};
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, PageSource};
