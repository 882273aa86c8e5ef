//! Storage module for persisting crawl results
//!
//! Append-only record store for finished crawls, supporting retrieval by
//! identifier and of the N most recent results.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{ResultStore, StorageError, StorageResult};

use serde::Serialize;
use std::path::Path;

/// Opens or creates a result store
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
pub fn open_store(path: &Path) -> StorageResult<SqliteStore> {
    SqliteStore::new(path)
}

/// A stored crawl result with its persistence metadata
#[derive(Debug, Clone, Serialize)]
pub struct StoredCrawl {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub markdown: String,
    pub character_count: usize,
    pub word_count: usize,
    pub pages_crawled: u32,
    pub created_at: String,
}
