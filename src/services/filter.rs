//! Filter engine.
//!
//! Each predicate is independently optional; active predicates are ANDed.
//! Filtering never touches ordinals, callers renumber afterwards.

use crate::models::{BUDGET_KEY, CATEGORY_KEY, Record, TITLE_KEY};
use crate::utils::amount::{eok_to_won, parse_amount};

/// Conjunction of optional record predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    /// Minimum assigned budget in won
    pub min_budget: Option<i64>,
    /// Title must contain at least one of these (case-sensitive)
    pub title_keywords: Vec<String>,
    /// Business category must equal this after trimming
    pub category: Option<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_budget(mut self, won: i64) -> Self {
        self.min_budget = Some(won);
        self
    }

    /// Minimum budget given in eok; blank or non-positive input clears it.
    pub fn with_min_budget_eok(mut self, eok: &str) -> Self {
        self.min_budget = eok_to_won(eok);
        self
    }

    /// Keywords from a comma-separated list; blanks are dropped.
    pub fn with_keywords(mut self, csv: &str) -> Self {
        self.title_keywords = csv
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    /// Exact category; a blank value means no category filter.
    pub fn with_category(mut self, category: &str) -> Self {
        let category = category.trim();
        self.category = (!category.is_empty()).then(|| category.to_string());
        self
    }

    /// True when no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.min_budget.is_none() && self.title_keywords.is_empty() && self.category.is_none()
    }

    /// Evaluate every active predicate against a record.
    pub fn passes(&self, record: &Record) -> bool {
        self.passes_budget(record) && self.passes_keywords(record) && self.passes_category(record)
    }

    /// Keep only passing records, preserving order.
    pub fn apply(&self, records: Vec<Record>) -> Vec<Record> {
        if self.is_empty() {
            return records;
        }
        records.into_iter().filter(|r| self.passes(r)).collect()
    }

    fn passes_budget(&self, record: &Record) -> bool {
        let Some(min) = self.min_budget else {
            return true;
        };
        record
            .get(BUDGET_KEY)
            .and_then(parse_amount)
            .is_some_and(|amount| amount >= min)
    }

    fn passes_keywords(&self, record: &Record) -> bool {
        if self.title_keywords.is_empty() {
            return true;
        }
        let title = record.get(TITLE_KEY).unwrap_or_default().trim();
        self.title_keywords.iter().any(|kw| title.contains(kw.as_str()))
    }

    fn passes_category(&self, record: &Record) -> bool {
        let Some(wanted) = &self.category else {
            return true;
        };
        record
            .get(CATEGORY_KEY)
            .is_some_and(|actual| actual.trim() == wanted.trim())
    }
}

/// Free-function form of [`FilterSet::passes`].
pub fn passes_filters(record: &Record, filters: &FilterSet) -> bool {
    filters.passes(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, budget: &str, category: &str) -> Record {
        let mut r = Record::new(1);
        r.set(TITLE_KEY, title);
        r.set(BUDGET_KEY, budget);
        r.set(CATEGORY_KEY, category);
        r
    }

    fn sample() -> Vec<Record> {
        vec![
            record("서버 유지보수 용역", "1,000,000,000", "용역"),
            record("노트북 구매", "50,000,000", "물품"),
            record("클라우드 전환 사업", "", "용역"),
            record("네트워크 장비", "미정", " 물품 "),
        ]
    }

    fn titles(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.get(TITLE_KEY).unwrap()).collect()
    }

    #[test]
    fn empty_set_passes_everything() {
        let filters = FilterSet::new();
        assert!(filters.is_empty());
        assert_eq!(filters.apply(sample()).len(), 4);
    }

    #[test]
    fn min_budget_rejects_unparsable_and_empty() {
        let filters = FilterSet::new().with_min_budget(900_000_000);
        assert_eq!(titles(&filters.apply(sample())), ["서버 유지보수 용역"]);

        let zero = FilterSet::new().with_min_budget(0);
        assert_eq!(zero.apply(sample()).len(), 2);
    }

    #[test]
    fn keywords_match_any_substring() {
        let filters = FilterSet::new().with_keywords("노트북, 클라우드 ,,");
        assert_eq!(filters.title_keywords, ["노트북", "클라우드"]);
        assert_eq!(
            titles(&filters.apply(sample())),
            ["노트북 구매", "클라우드 전환 사업"]
        );
    }

    #[test]
    fn keywords_are_case_sensitive() {
        let filters = FilterSet::new().with_keywords("server");
        assert!(!filters.passes(&record("Server upgrade", "1", "용역")));
    }

    #[test]
    fn category_matches_exactly_after_trim() {
        let filters = FilterSet::new().with_category(" 물품");
        assert_eq!(
            titles(&filters.apply(sample())),
            ["노트북 구매", "네트워크 장비"]
        );
        assert!(FilterSet::new().with_category("  ").category.is_none());
    }

    #[test]
    fn predicates_are_conjoined_and_idempotent() {
        let filters = FilterSet::new()
            .with_min_budget(10_000_000)
            .with_category("물품");
        let once = filters.apply(sample());
        assert_eq!(titles(&once), ["노트북 구매"]);
        assert_eq!(filters.apply(once.clone()), once);
        assert!(passes_filters(&once[0], &filters));
    }

    #[test]
    fn eok_budget_conversion() {
        assert_eq!(
            FilterSet::new().with_min_budget_eok("9").min_budget,
            Some(900_000_000)
        );
        assert_eq!(FilterSet::new().with_min_budget_eok("").min_budget, None);
    }
}
