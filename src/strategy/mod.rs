//! Extraction strategies - interchangeable crawl pipelines
//!
//! A strategy is one complete way of turning a crawl policy into a crawl
//! result. The chain tries strategies in order and returns the first
//! success; the static fetch-and-parse pipeline is the guaranteed
//! fallback, and a rendering-capable adapter can slot in ahead of it
//! behind the same trait.

mod static_pipeline;

pub use static_pipeline::StaticPipeline;

use crate::crawler::CrawlResult;
use crate::policy::CrawlPolicy;
use crate::SitemarkError;
use async_trait::async_trait;

/// One interchangeable extraction pipeline
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Name used in logs when the chain reports attempts
    fn name(&self) -> &str;

    /// Attempts a full crawl under this strategy
    async fn attempt(&self, policy: &CrawlPolicy) -> Result<CrawlResult, SitemarkError>;
}

/// Ordered chain of strategies; first success wins
pub struct StrategyChain {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl StrategyChain {
    /// Creates a chain from an ordered strategy list
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// The default chain: just the static fetch-and-parse pipeline
    pub fn static_only() -> Self {
        Self::new(vec![Box::new(StaticPipeline::new())])
    }

    /// Runs the chain until a strategy succeeds
    ///
    /// A strategy that fails logs and falls through to the next. When
    /// every strategy fails, the last error is surfaced wrapped in
    /// [`SitemarkError::StrategiesExhausted`].
    pub async fn run(&self, policy: &CrawlPolicy) -> Result<CrawlResult, SitemarkError> {
        let mut last_error: Option<SitemarkError> = None;

        for strategy in &self.strategies {
            tracing::debug!(strategy = strategy.name(), "attempting extraction strategy");
            match strategy.attempt(policy).await {
                Ok(result) => {
                    tracing::info!(
                        strategy = strategy.name(),
                        pages = result.pages_crawled,
                        "extraction strategy succeeded"
                    );
                    return Ok(result);
                }
                Err(e) => {
                    tracing::warn!(
                        strategy = strategy.name(),
                        error = %e,
                        "extraction strategy failed, falling through"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(SitemarkError::StrategiesExhausted {
            last: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no strategies configured".to_string()),
        })
    }
}
