//! Sitemark: a bounded web-to-markdown crawl engine
//!
//! This crate crawls a seed URL (optionally following links breadth-first
//! within policy limits), extracts the readable content of each page, and
//! converts it to a single aggregated markdown document.

pub mod crawler;
pub mod extract;
pub mod policy;
pub mod storage;
pub mod strategy;

use thiserror::Error;

/// Main error type for sitemark operations
///
/// Only seed failure and strategy exhaustion terminate a crawl; every other
/// per-page problem is absorbed into the partial result.
#[derive(Debug, Error)]
pub enum SitemarkError {
    #[error("Failed to fetch seed URL {url}: {reason}")]
    Seed { url: String, reason: String },

    #[error("All extraction strategies failed, last error: {last}")]
    StrategiesExhausted { last: String },

    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Policy-specific errors
///
/// Raised at the invocation boundary only; a policy that reaches the engine
/// has already passed validation.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Failed to read policy file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in policy: {0}")]
    InvalidUrl(String),
}

/// Result type alias for sitemark operations
pub type Result<T> = std::result::Result<T, SitemarkError>;

/// Result type alias for policy operations
pub type PolicyResult<T> = std::result::Result<T, PolicyError>;

// Re-export commonly used types
pub use crawler::{CrawlResult, PageResult};
pub use policy::CrawlPolicy;
pub use strategy::{ExtractionStrategy, StrategyChain};
