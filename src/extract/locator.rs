//! Content locator - finds the main readable region of a page
//!
//! Searches the parsed document for the subtree most likely to hold the
//! primary content, using a priority-ordered list of semantic selectors
//! before falling back to the whole body. This is a pure read: the source
//! document is never mutated.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

// Hardcoded selectors are parsed once at first access and cached forever.
// They can never fail to parse; if one does, it is a bug in this file.

static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("hardcoded selector 'body' is valid"));

/// Priority-ordered selectors for the main content region
///
/// Semantic elements come first, then the class/id vocabulary commonly used
/// for content containers. First match wins.
static CONTENT_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        "main",
        "article",
        "[role='main']",
        "#main-content",
        ".main-content",
        "#content",
        ".content",
        ".article-content",
        ".post-content",
        "#article",
        "#post",
        "#main",
    ]
    .iter()
    .map(|s| Selector::parse(s).expect("hardcoded content selector is valid"))
    .collect()
});

/// Locates the content root of a parsed document
///
/// When `only_main_content` is false the whole `<body>` is returned. When
/// true, the first element matching the content vocabulary wins; documents
/// without any recognizable content container fall back to the body.
///
/// # Arguments
///
/// * `document` - The parsed HTML document
/// * `only_main_content` - Whether to search for a main-content region
///
/// # Returns
///
/// The element to treat as the content root. For documents without a body
/// (never produced by `Html::parse_document`, but possible for fragments)
/// the document root is returned.
pub fn locate(document: &Html, only_main_content: bool) -> ElementRef<'_> {
    let body = document
        .select(&BODY_SELECTOR)
        .next()
        .unwrap_or_else(|| document.root_element());

    if !only_main_content {
        return body;
    }

    for selector in CONTENT_SELECTORS.iter() {
        if let Some(element) = document.select(selector).next() {
            return element;
        }
    }

    body
}
