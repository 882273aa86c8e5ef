//! Crawler module - bounded breadth-first page traversal
//!
//! This module contains the core crawl engine:
//! - HTTP fetching with policy headers and timeouts
//! - The FIFO frontier with visited/enqueued dedup
//! - The traversal controller orchestrating fetch, extraction, and
//!   aggregation
//! - The result types handed back across the engine boundary

mod coordinator;
mod fetcher;
mod frontier;
mod result;

pub use coordinator::{Coordinator, DEFAULT_CRAWL_BUDGET};
pub use fetcher::{build_http_client, fetch_page, FetchResult};
pub use frontier::Frontier;
pub use result::{CrawlResult, PageResult, DEFAULT_TITLE};

use crate::policy::CrawlPolicy;
use crate::SitemarkError;

/// Runs a complete crawl for a validated policy
///
/// Convenience entry point: builds a [`Coordinator`] with the default
/// budget and runs it to completion.
///
/// # Arguments
///
/// * `policy` - The validated crawl policy
///
/// # Returns
///
/// * `Ok(CrawlResult)` - The aggregate result (possibly partial)
/// * `Err(SitemarkError)` - Seed fetch failure only
pub async fn run_crawl(policy: CrawlPolicy) -> Result<CrawlResult, SitemarkError> {
    Coordinator::new(policy)?.run().await
}
