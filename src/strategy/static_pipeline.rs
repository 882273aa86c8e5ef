//! Static fetch-and-parse strategy
//!
//! Wraps the traversal controller as an [`ExtractionStrategy`]. Works on
//! fetched HTML only; pages that need JavaScript to produce their content
//! come back mostly empty, which is exactly when a rendering strategy in
//! front of this one earns its place.

use crate::crawler::{Coordinator, CrawlResult, DEFAULT_CRAWL_BUDGET};
use crate::policy::CrawlPolicy;
use crate::strategy::ExtractionStrategy;
use crate::SitemarkError;
use async_trait::async_trait;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// The guaranteed-fallback strategy: plain HTTP fetch + static parse
pub struct StaticPipeline {
    budget: Duration,
    cancelled: Arc<AtomicBool>,
}

impl StaticPipeline {
    /// Creates the strategy with the default crawl budget
    pub fn new() -> Self {
        Self {
            budget: DEFAULT_CRAWL_BUDGET,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Overrides the per-invocation wall-clock budget
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    /// Handle for cancelling crawls run by this strategy
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }
}

impl Default for StaticPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtractionStrategy for StaticPipeline {
    fn name(&self) -> &str {
        "static-fetch"
    }

    async fn attempt(&self, policy: &CrawlPolicy) -> Result<CrawlResult, SitemarkError> {
        Coordinator::new(policy.clone())?
            .with_budget(self.budget)
            .with_cancel_flag(self.cancelled.clone())
            .run()
            .await
    }
}
