// src/services/collector.rs

//! Paginated collector.
//!
//! Page 1 is fetched alone to learn the total count. Remaining pages are
//! fetched concurrently in fixed-size batches with a pause between batches,
//! each page wrapped in exponential-backoff retry. Results are merged by page
//! number and renumbered once at the end.
//!
//! ```text
//! INIT -> FETCH_PAGE_1 -> DONE
//!                      -> FETCH_REMAINING (batch, pause, batch, ...) -> MERGE -> DONE
//! ```
//!
//! Any page that exhausts its retries aborts the whole collection.

use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, Result};
use crate::models::{
    AggregateResult, CollectorConfig, Config, DateRange, PageRequest, PageResult, default_schema,
    renumber,
};

use super::envelope::parse_envelope;
use super::filter::FilterSet;
use super::projector::project_page;
use super::retry::RetryPolicy;
use super::transport::{HttpTransport, PageSource};

/// Number of pages needed to cover `total_count` rows.
pub fn pages_needed(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Drives fetch, parse, projection and filtering across pages.
pub struct BidCollector {
    source: Arc<dyn PageSource>,
    base_url: String,
    credential: String,
    policy: CollectorConfig,
    retry: RetryPolicy,
    schema: Vec<String>,
}

impl BidCollector {
    /// Create a collector over an arbitrary page source.
    pub fn new(source: Arc<dyn PageSource>, config: &Config) -> Self {
        Self {
            source,
            base_url: config.api.base_url.clone(),
            credential: config.api.service_key.clone(),
            policy: config.collector.clone(),
            retry: RetryPolicy::from(&config.retry),
            schema: default_schema(),
        }
    }

    /// Create a collector talking HTTP to the configured endpoint.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(&config.api)?;
        Ok(Self::new(Arc::new(transport), config))
    }

    /// Replace the column schema.
    pub fn with_schema(mut self, schema: Vec<String>) -> Self {
        self.schema = schema;
        self
    }

    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    /// Fetch and project a single page without filtering.
    pub async fn fetch_one_page(
        &self,
        range: &DateRange,
        page_size: u32,
        page_number: u32,
    ) -> Result<PageResult> {
        if page_size == 0 || page_number == 0 {
            return Err(AppError::validation(
                "page size and page number must both be at least 1",
            ));
        }
        let cancel = CancellationToken::new();
        self.fetch_page(range, page_size, page_number, None, &cancel)
            .await
    }

    /// Fetch every page of `range`, keep records passing `filters`, and merge
    /// them in page order.
    ///
    /// `max_pages` bounds the total number of pages requested, page 1 included.
    /// Cancelling `cancel` stops the collection without waiting for in-flight
    /// requests and yields [`AppError::Aborted`].
    pub async fn fetch_all_filtered(
        &self,
        range: &DateRange,
        filters: &FilterSet,
        max_pages: u32,
        cancel: &CancellationToken,
    ) -> Result<AggregateResult> {
        if max_pages == 0 {
            return Err(AppError::validation("max_pages must be at least 1"));
        }
        if self.policy.page_size == 0 || self.policy.batch_size == 0 {
            return Err(AppError::config("page_size and batch_size must be > 0"));
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::error!("Collection for {} aborted", range);
                Err(AppError::Aborted)
            }
            result = self.collect(range, filters, max_pages, cancel) => result,
        }
    }

    async fn collect(
        &self,
        range: &DateRange,
        filters: &FilterSet,
        max_pages: u32,
        cancel: &CancellationToken,
    ) -> Result<AggregateResult> {
        let page_size = self.policy.page_size;

        let first = self
            .fetch_page(range, page_size, 1, Some(filters), cancel)
            .await?;
        let summary = first.summary.clone();
        log::info!(
            "Page 1: {} item(s), {} kept, total count {}",
            first.raw_item_count,
            first.records.len(),
            summary.total_count
        );

        if first.raw_item_count < page_size as usize {
            return Ok(AggregateResult::merge(summary, &self.schema, vec![first]));
        }

        let needed = pages_needed(summary.total_count, page_size);
        let last_page = needed.min(max_pages);
        if needed > max_pages {
            log::warn!(
                "Total count {} needs {} pages; capping at {}",
                summary.total_count,
                needed,
                max_pages
            );
        }
        if last_page <= 1 {
            return Ok(AggregateResult::merge(summary, &self.schema, vec![first]));
        }

        let remaining: Vec<u32> = (2..=last_page).collect();
        let batch_count = remaining.len().div_ceil(self.policy.batch_size);
        let mut pages = Vec::with_capacity(remaining.len() + 1);
        pages.push(first);

        for (index, batch) in remaining.chunks(self.policy.batch_size).enumerate() {
            if index > 0 {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(AppError::Aborted),
                    _ = tokio::time::sleep(self.policy.batch_delay()) => {}
                }
            }
            if cancel.is_cancelled() {
                return Err(AppError::Aborted);
            }

            log::info!(
                "Batch {}/{}: pages {}..={}",
                index + 1,
                batch_count,
                batch[0],
                batch[batch.len() - 1]
            );

            let fetched: Vec<PageResult> = stream::iter(batch.iter().copied())
                .map(|page| self.fetch_page(range, page_size, page, Some(filters), cancel))
                .buffer_unordered(batch.len())
                .try_collect()
                .await?;
            pages.extend(fetched);
        }

        let aggregate = AggregateResult::merge(summary, &self.schema, pages);
        log::info!(
            "Collected {} record(s) from {} page(s)",
            aggregate.len(),
            aggregate.pages_fetched()
        );
        Ok(aggregate)
    }

    /// Fetch, parse, project and optionally filter one page, with retry.
    async fn fetch_page(
        &self,
        range: &DateRange,
        page_size: u32,
        page_number: u32,
        filters: Option<&FilterSet>,
        cancel: &CancellationToken,
    ) -> Result<PageResult> {
        let request = PageRequest::new(
            &self.base_url,
            &self.credential,
            range,
            page_size,
            page_number,
        );

        let envelope = self
            .retry
            .run(page_number, cancel, |attempt| {
                let request = &request;
                async move {
                    if attempt > 1 {
                        log::debug!("Page {} attempt {}", page_number, attempt);
                    }
                    let body = self.source.fetch_page(request).await?;
                    Ok(parse_envelope(&body)?)
                }
            })
            .await?;

        let raw_item_count = envelope.items.len();
        let mut records = project_page(&envelope, &self.schema);
        if let Some(filters) = filters {
            records = filters.apply(records);
            renumber(&mut records);
        }

        Ok(PageResult {
            page_number,
            records,
            raw_item_count,
            summary: envelope.summary(),
        })
    }
}
