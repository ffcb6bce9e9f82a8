//! Pipeline entry points for collector operations.
//!
//! - `run_collect`: Filtered multi-page collection for a date range
//! - `run_page`: Single unfiltered page
//! - `validate`: Caller-side range and filter input checks

pub mod collect;
pub mod validate;

pub use collect::{run_collect, run_page, write_json};
pub use validate::{FilterInput, build_filters, validate_range};
