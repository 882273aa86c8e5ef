//! Traversal controller - the main crawl loop
//!
//! Drives a breadth-first traversal from the seed URL: pulls the next URL
//! off the frontier, fetches it, feeds discovered links back in while the
//! depth and page limits allow, runs the extraction pipeline, and appends
//! each page to the aggregate. Only a seed failure is fatal; every other
//! per-page error is recorded and skipped.

use crate::crawler::fetcher::{build_http_client, fetch_page, FetchResult};
use crate::crawler::frontier::Frontier;
use crate::crawler::result::{CrawlResult, PageResult};
use crate::extract::extract_page;
use crate::policy::CrawlPolicy;
use crate::SitemarkError;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Default wall-clock budget for one crawl invocation
///
/// Bounds the whole traversal, independent of the per-fetch timeout. When
/// exceeded, the remaining frontier is dropped and whatever pages
/// completed are returned.
pub const DEFAULT_CRAWL_BUDGET: Duration = Duration::from_secs(600);

/// Crawl coordinator owning the traversal state for one invocation
///
/// Each invocation is independent; nothing is shared across crawls, so any
/// number of coordinators may run concurrently.
pub struct Coordinator {
    policy: CrawlPolicy,
    client: Client,
    seed: Url,
    seed_host: String,
    budget: Duration,
    cancelled: Arc<AtomicBool>,
}

impl Coordinator {
    /// Creates a coordinator for a validated policy
    ///
    /// Fails when the seed URL does not parse or the HTTP client cannot be
    /// built from the policy's headers.
    pub fn new(policy: CrawlPolicy) -> Result<Self, SitemarkError> {
        let seed = Url::parse(&policy.url)?;
        let seed_host = seed
            .host_str()
            .ok_or_else(|| SitemarkError::Seed {
                url: policy.url.clone(),
                reason: "missing host".to_string(),
            })?
            .to_string();

        let client = build_http_client(&policy)?;

        Ok(Self {
            policy,
            client,
            seed,
            seed_host,
            budget: DEFAULT_CRAWL_BUDGET,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Overrides the wall-clock budget for this invocation
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    /// Uses an externally owned cancellation flag
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = flag;
        self
    }

    /// Handle for requesting cancellation from another task
    ///
    /// The flag is checked at the top of the per-URL loop, so cancellation
    /// takes effect within one page-fetch latency.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// Runs the crawl to completion and returns the aggregate result
    ///
    /// Terminates when the frontier is exhausted, the page limit is
    /// reached, the budget expires, or cancellation is requested. Fails
    /// only when the seed page itself cannot be fetched.
    pub async fn run(&self) -> Result<CrawlResult, SitemarkError> {
        let start = Instant::now();

        if let Some(selector) = &self.policy.wait_for_selector {
            tracing::debug!(
                selector,
                "wait-for-selector is advisory; the static pipeline does not render"
            );
        }

        let mut frontier = Frontier::new(self.seed.clone());
        let mut pages: Vec<PageResult> = Vec::new();
        let mut crawl_title: Option<String> = None;
        let mut pages_crawled: u32 = 0;
        let mut position: u32 = 0;
        let mut seed_fetched = false;

        while pages_crawled < self.policy.max_pages {
            if self.cancelled.load(Ordering::Relaxed) {
                tracing::info!("crawl cancelled, returning partial result");
                break;
            }

            if start.elapsed() >= self.budget {
                tracing::warn!(
                    budget_secs = self.budget.as_secs(),
                    "crawl budget exhausted, dropping {} queued URLs",
                    frontier.len()
                );
                break;
            }

            let Some((url, depth)) = frontier.pop() else {
                break;
            };

            if frontier.is_visited(&url) {
                continue;
            }

            position += 1;
            tracing::debug!(url = %url, depth, "fetching page");

            let (final_url, body) = match fetch_page(&self.client, url.as_str()).await {
                FetchResult::Success {
                    final_url, body, ..
                } => (final_url, body),
                failure => {
                    let reason = failure
                        .failure_reason()
                        .unwrap_or_else(|| "unknown fetch error".to_string());

                    if !seed_fetched {
                        return Err(SitemarkError::Seed {
                            url: url.to_string(),
                            reason,
                        });
                    }

                    tracing::warn!(url = %url, %reason, "page fetch failed, skipping");
                    frontier.mark_visited(&url);
                    pages.push(PageResult {
                        url: url.to_string(),
                        title: None,
                        markdown: String::new(),
                        position,
                        error: Some(reason),
                    });
                    continue;
                }
            };

            seed_fetched = true;
            frontier.mark_visited(&url);
            pages_crawled += 1;

            // Redirects may have moved us; resolve links against where the
            // page actually came from
            let base_url = Url::parse(&final_url).unwrap_or_else(|_| url.clone());
            let expand = pages_crawled < self.policy.max_pages && depth < self.policy.max_depth;

            let extracted = extract_page(&body, &base_url, &self.seed_host, &self.policy, expand);

            if pages_crawled == 1 {
                crawl_title = extracted.title.clone();
            }

            for link in extracted.links {
                frontier.enqueue(link, depth + 1);
            }

            tracing::info!(
                url = %url,
                page = pages_crawled,
                queued = frontier.len(),
                "page crawled"
            );

            pages.push(PageResult {
                url: url.to_string(),
                title: extracted.title,
                markdown: extracted.markdown,
                position,
                error: None,
            });
        }

        tracing::info!(
            pages_crawled,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "crawl finished"
        );

        Ok(CrawlResult::assemble(pages, crawl_title, pages_crawled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_policy() -> CrawlPolicy {
        CrawlPolicy::for_url("https://example.com/")
    }

    #[test]
    fn test_new_rejects_unparsable_seed() {
        let mut policy = test_policy();
        policy.url = "::not a url::".to_string();
        assert!(Coordinator::new(policy).is_err());
    }

    #[tokio::test]
    async fn test_cancelled_before_start_returns_empty_partial() {
        let coordinator = Coordinator::new(test_policy()).unwrap();
        coordinator.cancel_handle().store(true, Ordering::Relaxed);

        // No fetch happens: the flag is checked before the first dequeue
        let result = coordinator.run().await.unwrap();
        assert_eq!(result.pages_crawled, 0);
        assert!(result.markdown.is_empty());
        assert_eq!(result.title, crate::crawler::result::DEFAULT_TITLE);
    }

    #[tokio::test]
    async fn test_zero_budget_returns_empty_partial() {
        let coordinator = Coordinator::new(test_policy())
            .unwrap()
            .with_budget(Duration::ZERO);

        let result = coordinator.run().await.unwrap();
        assert_eq!(result.pages_crawled, 0);
    }
}
