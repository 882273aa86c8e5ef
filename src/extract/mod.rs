//! Content extraction pipeline
//!
//! This module turns a fetched HTML page into markdown and discovered
//! links, in four stages:
//! - locate the main-content subtree ([`locator`])
//! - strip non-content elements per policy ([`sanitizer`])
//! - convert the cleaned fragment to markdown ([`markdown`])
//! - drop low-information lines ([`filter`])
//!
//! Link discovery ([`links`]) runs against the full document, not the
//! located subtree, so navigation links still feed the frontier.

pub mod filter;
pub mod links;
pub mod locator;
pub mod markdown;
pub mod sanitizer;

use crate::policy::CrawlPolicy;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

pub use filter::filter_markdown;
pub use links::{classify_host, extract_links, HostRelation};
pub use locator::locate;
pub use markdown::convert;
pub use sanitizer::sanitize;

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("hardcoded selector 'title' is valid"));

/// Everything the engine needs from one fetched page
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    /// The page `<title>`, trimmed; None when absent or empty
    pub title: Option<String>,

    /// The page content as filtered markdown (may be empty)
    pub markdown: String,

    /// Policy-admissible links, in document order (empty when link
    /// discovery was not requested)
    pub links: Vec<Url>,
}

/// Runs the full extraction pipeline over one page
///
/// # Arguments
///
/// * `html` - The fetched page body
/// * `page_url` - The page's URL (post-redirect), used to resolve links
/// * `seed_host` - Host of the crawl seed, for link classification
/// * `policy` - The crawl policy
/// * `collect_links` - Whether to run link discovery (the traversal
///   controller skips it once depth or page limits rule out enqueuing)
pub fn extract_page(
    html: &str,
    page_url: &Url,
    seed_host: &str,
    policy: &CrawlPolicy,
    collect_links: bool,
) -> ExtractedPage {
    let document = Html::parse_document(html);

    let title = extract_title(&document);

    let links = if collect_links {
        links::extract_links(&document, page_url, seed_host, policy)
    } else {
        Vec::new()
    };

    let root = locator::locate(&document, policy.only_main_content);
    let cleaned = sanitizer::sanitize(root, policy);
    let converted = markdown::convert(&cleaned, policy.remove_links, policy.remove_images);
    let markdown = filter::filter_markdown(&converted, policy.word_count_threshold);

    ExtractedPage {
        title,
        markdown,
        links,
    }
}

/// Extracts the page title from the `<title>` element
fn extract_title(document: &Html) -> Option<String> {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    #[test]
    fn test_extract_title() {
        let document = Html::parse_document(
            "<html><head><title>  My Page  </title></head><body></body></html>",
        );
        assert_eq!(extract_title(&document), Some("My Page".to_string()));
    }

    #[test]
    fn test_missing_title() {
        let document = Html::parse_document("<html><head></head><body></body></html>");
        assert_eq!(extract_title(&document), None);
    }

    #[test]
    fn test_full_pipeline() {
        let policy = CrawlPolicy::for_url("https://example.com/");
        let html = r#"
            <html>
            <head><title>Docs</title><script>tracking()</script></head>
            <body>
                <nav><a href="/nav-target">nav link</a></nav>
                <main>
                    <h1>Welcome</h1>
                    <p>Some <strong>useful</strong> content.</p>
                    <a href="/next">next page</a>
                </main>
            </body>
            </html>
        "#;

        let page = extract_page(html, &page_url(), "example.com", &policy, true);

        assert_eq!(page.title, Some("Docs".to_string()));
        assert!(page.markdown.contains("# Welcome"));
        assert!(page.markdown.contains("**useful**"));
        assert!(!page.markdown.contains("tracking"));
        // nav is furniture for content, but its links still feed discovery
        assert!(!page.markdown.contains("nav link"));
        let links: Vec<String> = page.links.iter().map(Url::to_string).collect();
        assert!(links.contains(&"https://example.com/nav-target".to_string()));
        assert!(links.contains(&"https://example.com/next".to_string()));
    }

    #[test]
    fn test_links_skipped_when_not_requested() {
        let policy = CrawlPolicy::for_url("https://example.com/");
        let html = r#"<html><body><a href="/next">next</a></body></html>"#;
        let page = extract_page(html, &page_url(), "example.com", &policy, false);
        assert!(page.links.is_empty());
    }

    #[test]
    fn test_word_threshold_applied() {
        let mut policy = CrawlPolicy::for_url("https://example.com/");
        policy.word_count_threshold = 4;
        let html = r#"
            <html><body><main>
                <h1>Title</h1>
                <p>tiny</p>
                <p>this paragraph clearly has enough words</p>
            </main></body></html>
        "#;
        let page = extract_page(html, &page_url(), "example.com", &policy, false);
        assert!(page.markdown.contains("# Title"));
        assert!(!page.markdown.contains("tiny"));
        assert!(page.markdown.contains("this paragraph clearly has enough words"));
    }
}
