//! SQLite result store implementation

use crate::crawler::CrawlResult;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ResultStore, StorageError, StorageResult};
use crate::storage::StoredCrawl;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const SELECT_COLUMNS: &str =
    "id, url, title, markdown, character_count, word_count, pages_crawled, created_at";

/// SQLite-backed crawl-result store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates a store at the given path
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open or initialize
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory store (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn row_to_stored(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredCrawl> {
    Ok(StoredCrawl {
        id: row.get(0)?,
        url: row.get(1)?,
        title: row.get(2)?,
        markdown: row.get(3)?,
        character_count: row.get::<_, i64>(4)? as usize,
        word_count: row.get::<_, i64>(5)? as usize,
        pages_crawled: row.get(6)?,
        created_at: row.get(7)?,
    })
}

impl ResultStore for SqliteStore {
    fn insert(&mut self, url: &str, result: &CrawlResult) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO crawl_results
             (url, title, markdown, character_count, word_count, pages_crawled, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                url,
                result.title,
                result.markdown,
                result.character_count as i64,
                result.word_count as i64,
                result.pages_crawled,
                now
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get(&self, id: i64) -> StorageResult<Option<StoredCrawl>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM crawl_results WHERE id = ?1",
            SELECT_COLUMNS
        ))?;

        let stored = stmt.query_row(params![id], row_to_stored).optional()?;
        Ok(stored)
    }

    fn recent(&self, limit: u32) -> StorageResult<Vec<StoredCrawl>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM crawl_results ORDER BY id DESC LIMIT ?1",
            SELECT_COLUMNS
        ))?;

        let rows = stmt.query_map(params![limit], row_to_stored)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    fn count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM crawl_results", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::PageResult;

    fn sample_result(markdown: &str) -> CrawlResult {
        CrawlResult::assemble(
            vec![PageResult {
                url: "https://example.com/".to_string(),
                title: Some("Example".to_string()),
                markdown: markdown.to_string(),
                position: 1,
                error: None,
            }],
            Some("Example".to_string()),
            1,
        )
    }

    #[test]
    fn test_insert_and_get_roundtrip() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        let result = sample_result("# Hello\n\nWorld");

        let id = store.insert("https://example.com/", &result).unwrap();
        let stored = store.get(id).unwrap().expect("stored result");

        assert_eq!(stored.id, id);
        assert_eq!(stored.url, "https://example.com/");
        assert_eq!(stored.title, "Example");
        assert_eq!(stored.markdown, "# Hello\n\nWorld");
        assert_eq!(stored.character_count, result.character_count);
        assert_eq!(stored.word_count, result.word_count);
        assert_eq!(stored.pages_crawled, 1);
        assert!(!stored.created_at.is_empty());
    }

    #[test]
    fn test_get_missing_returns_none() {
        let store = SqliteStore::new_in_memory().unwrap();
        assert!(store.get(42).unwrap().is_none());
    }

    #[test]
    fn test_recent_orders_newest_first() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        for i in 0..4 {
            let result = sample_result(&format!("content {}", i));
            store
                .insert(&format!("https://example.com/{}", i), &result)
                .unwrap();
        }

        let recent = store.recent(3).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].url, "https://example.com/3");
        assert_eq!(recent[1].url, "https://example.com/2");
        assert_eq!(recent[2].url, "https://example.com/1");
    }

    #[test]
    fn test_recent_with_fewer_rows_than_limit() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        store
            .insert("https://example.com/", &sample_result("x"))
            .unwrap();

        let recent = store.recent(10).unwrap();
        assert_eq!(recent.len(), 1);
    }

    #[test]
    fn test_count() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        assert_eq!(store.count().unwrap(), 0);
        store
            .insert("https://example.com/", &sample_result("x"))
            .unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }
}
