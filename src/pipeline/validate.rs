//! Caller-side query validation.
//!
//! The engine only checks timestamp shape and ordering; the span cap the
//! upstream enforces (one month, observed) is checked here before any request.

use chrono::Months;

use crate::error::{AppError, Result};
use crate::models::DateRange;
use crate::services::FilterSet;
use crate::utils::amount::parse_amount;

/// Category value meaning "no category filter".
const ALL_CATEGORIES: &str = "전체";

/// Reject ranges longer than `max_months` calendar months. Zero disables the cap.
pub fn validate_range(range: &DateRange, max_months: u32) -> Result<()> {
    if max_months == 0 {
        return Ok(());
    }
    let start = range.start_time()?;
    let end = range.end_time()?;
    let limit = start
        .checked_add_months(Months::new(max_months))
        .ok_or_else(|| {
            AppError::validation(format!("range start {} is out of bounds", range.start()))
        })?;

    if end > limit {
        return Err(AppError::validation(format!(
            "range {range} exceeds {max_months} month(s)"
        )));
    }
    Ok(())
}

/// Raw filter inputs as typed by a user.
#[derive(Debug, Clone, Default)]
pub struct FilterInput<'a> {
    /// Minimum budget in won, commas allowed
    pub min_budget: Option<&'a str>,
    /// Minimum budget in eok; ignored when `min_budget` is given
    pub min_budget_eok: Option<&'a str>,
    /// Comma-separated title keywords
    pub keywords: Option<&'a str>,
    /// Exact business category, or "전체"
    pub category: Option<&'a str>,
}

/// Turn raw filter inputs into a [`FilterSet`].
pub fn build_filters(input: &FilterInput<'_>) -> Result<FilterSet> {
    let mut filters = FilterSet::new();

    match (input.min_budget, input.min_budget_eok) {
        (Some(won), _) if !won.trim().is_empty() => {
            let amount = parse_amount(won).ok_or_else(|| {
                AppError::validation(format!("min budget '{won}' is not an integer"))
            })?;
            filters = filters.with_min_budget(amount);
        }
        (_, Some(eok)) => filters = filters.with_min_budget_eok(eok),
        _ => {}
    }

    if let Some(keywords) = input.keywords {
        filters = filters.with_keywords(keywords);
    }
    if let Some(category) = input.category {
        if category.trim() != ALL_CATEGORIES {
            filters = filters.with_category(category);
        }
    }
    Ok(filters)
}
