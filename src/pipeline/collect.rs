// src/pipeline/collect.rs

//! Query entry points used by the CLI.

use std::fs;
use std::path::Path;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, Result};
use crate::models::{AggregateResult, Config, DateRange, PageResult};
use crate::services::{BidCollector, FilterSet};

use super::validate::validate_range;

fn require_service_key(config: &Config) -> Result<()> {
    if config.api.service_key.trim().is_empty() {
        return Err(AppError::config(
            "api.service_key is empty (set it in config.toml or NARA_SERVICE_KEY)",
        ));
    }
    Ok(())
}

/// Run a filtered multi-page collection for `range`.
pub async fn run_collect(
    config: &Config,
    range: &DateRange,
    filters: &FilterSet,
    max_pages: Option<u32>,
    cancel: &CancellationToken,
) -> Result<AggregateResult> {
    config.validate()?;
    validate_range(range, config.collector.max_range_months)?;
    require_service_key(config)?;

    let start_time = Utc::now();
    log::info!("Collecting bid notices for {}", range);
    if !filters.is_empty() {
        log::info!("Filters: {:?}", filters);
    }

    let collector = BidCollector::from_config(config)?;
    let max_pages = max_pages.unwrap_or(config.collector.max_pages);
    let aggregate = collector
        .fetch_all_filtered(range, filters, max_pages, cancel)
        .await?;

    let elapsed = Utc::now() - start_time;
    let summary = aggregate.summary();
    log::info!(
        "Result {} ({}): {} of {} notice(s) kept from {} page(s) in {} ms",
        summary.result_code,
        summary.result_msg,
        aggregate.len(),
        summary.total_count,
        aggregate.pages_fetched(),
        elapsed.num_milliseconds()
    );

    Ok(aggregate)
}

/// Fetch a single unfiltered page.
pub async fn run_page(
    config: &Config,
    range: &DateRange,
    page_size: u32,
    page_number: u32,
) -> Result<PageResult> {
    config.validate()?;
    validate_range(range, config.collector.max_range_months)?;
    require_service_key(config)?;

    let collector = BidCollector::from_config(config)?;
    let page = collector
        .fetch_one_page(range, page_size, page_number)
        .await?;

    log::info!(
        "Page {}: {} notice(s), total count {}",
        page.page_number,
        page.raw_item_count,
        page.summary.total_count
    );
    Ok(page)
}

/// Write an aggregate as pretty JSON to `path`, or stdout when `None`.
pub fn write_json(aggregate: &AggregateResult, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(aggregate)?;
    match path {
        Some(path) => {
            fs::write(path, json)?;
            log::info!("Saved {} record(s) to {}", aggregate.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ResponseSummary, default_schema};

    #[tokio::test]
    async fn empty_service_key_fails_before_network() {
        let mut config = Config::default();
        config.api.service_key.clear();
        config.api.base_url = "http://127.0.0.1:9/unreachable".into();
        let range = DateRange::new("202501010000", "202501020000").unwrap();

        let err = run_collect(&config, &range, &FilterSet::new(), None, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn single_page_needs_service_key_too() {
        let mut config = Config::default();
        config.api.service_key = "   ".into();
        config.api.base_url = "http://127.0.0.1:9/unreachable".into();
        let range = DateRange::new("202501010000", "202501020000").unwrap();

        let err = run_page(&config, &range, 50, 1).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn over_long_range_fails_before_network() {
        let mut config = Config::default();
        config.api.service_key = "key".into();
        let range = DateRange::new("202501010000", "202503010000").unwrap();

        let err = run_collect(&config, &range, &FilterSet::new(), None, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn writes_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let aggregate = AggregateResult::merge(ResponseSummary::default(), &default_schema(), vec![]);

        write_json(&aggregate, Some(&path)).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["records"], serde_json::json!([]));
        assert_eq!(written["columns"][0]["name"], "순번");
    }
}
