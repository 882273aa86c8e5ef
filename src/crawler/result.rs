//! Crawl result types
//!
//! Per-page outcomes and the aggregate result the traversal controller
//! hands back: combined markdown with page-boundary markers, the crawl
//! title, and character/word counts computed at finalization.

use serde::Serialize;

/// Title used when the first successful page has no `<title>`
pub const DEFAULT_TITLE: &str = "Untitled";

/// Outcome of processing one frontier entry
#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    /// The URL as it was requested
    pub url: String,

    /// The page title; only the first successful page's title matters to
    /// the aggregate
    pub title: Option<String>,

    /// Converted markdown (empty when the page failed or had no content)
    pub markdown: String,

    /// 1-based ordinal among processed frontier entries
    pub position: u32,

    /// Failure description when the page was skipped but the crawl
    /// continued
    pub error: Option<String>,
}

impl PageResult {
    /// Whether this page was fetched and converted successfully
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate outcome of one crawl invocation
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    /// Combined markdown of all successful pages in visit order
    pub markdown: String,

    /// Title of the first successfully fetched page, or [`DEFAULT_TITLE`]
    pub title: String,

    /// Number of successfully crawled pages
    pub pages_crawled: u32,

    /// Characters in the combined markdown
    pub character_count: usize,

    /// Whitespace-delimited tokens in the combined markdown
    pub word_count: usize,

    /// Per-page outcomes, including failed pages
    pub pages: Vec<PageResult>,
}

impl CrawlResult {
    /// Finalizes a crawl: joins page markdown and computes counts
    ///
    /// Successful pages are concatenated in visit order, separated by
    /// blank lines, each page after the first preceded by the boundary
    /// marker `--- Page {n}: {url} ---` where `n` is the page's success
    /// ordinal. Pages with empty markdown are skipped entirely.
    pub fn assemble(pages: Vec<PageResult>, title: Option<String>, pages_crawled: u32) -> Self {
        let mut segments: Vec<String> = Vec::new();
        let mut ordinal = 0u32;

        for page in &pages {
            if !page.is_success() {
                continue;
            }
            ordinal += 1;

            let content = page.markdown.trim();
            if content.is_empty() {
                continue;
            }

            if ordinal == 1 {
                segments.push(content.to_string());
            } else {
                segments.push(format!("--- Page {}: {} ---\n\n{}", ordinal, page.url, content));
            }
        }

        let markdown = segments.join("\n\n");
        let character_count = markdown.chars().count();
        let word_count = markdown.split_whitespace().count();

        Self {
            markdown,
            title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            pages_crawled,
            character_count,
            word_count,
            pages,
        }
    }
}
