//! Storage traits and error types
//!
//! Defines the result-store interface the engine boundary writes to and
//! the CLI reads from. The store is append-only from the engine's
//! perspective: results are inserted once and never updated.

use crate::crawler::CrawlResult;
use crate::storage::StoredCrawl;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Result not found: {0}")]
    NotFound(i64),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for crawl-result store implementations
///
/// Writes must be serialized per store handle; the engine performs exactly
/// one insert per completed crawl.
pub trait ResultStore {
    /// Inserts a finished crawl result
    ///
    /// # Arguments
    ///
    /// * `url` - The seed URL the crawl was invoked with
    /// * `result` - The aggregate crawl result
    ///
    /// # Returns
    ///
    /// The identifier of the stored record
    fn insert(&mut self, url: &str, result: &CrawlResult) -> StorageResult<i64>;

    /// Gets a stored result by identifier
    fn get(&self, id: i64) -> StorageResult<Option<StoredCrawl>>;

    /// Gets up to `limit` most recent results, newest first
    fn recent(&self, limit: u32) -> StorageResult<Vec<StoredCrawl>>;

    /// Total number of stored results
    fn count(&self) -> StorageResult<u64>;
}
