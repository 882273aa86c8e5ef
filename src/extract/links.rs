//! Link extractor - discovers policy-admissible URLs on a page
//!
//! Collects anchor hrefs, resolves them against the page URL, classifies
//! each candidate host against the seed host, and applies the crawl
//! policy's pattern filters. Never fails: malformed links are silently
//! dropped.

use crate::policy::CrawlPolicy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("hardcoded selector 'a[href]' is valid"));

/// How a candidate host relates to the seed host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRelation {
    /// Exactly the seed host
    Same,
    /// Subdomain of the seed host, or the seed is a subdomain of it
    Subdomain,
    /// Unrelated host
    External,
}

/// Classifies a host against the seed host
///
/// Both hosts are expected lowercase (the url crate lowercases hosts when
/// parsing).
pub fn classify_host(host: &str, seed_host: &str) -> HostRelation {
    if host == seed_host {
        HostRelation::Same
    } else if host.ends_with(&format!(".{}", seed_host))
        || seed_host.ends_with(&format!(".{}", host))
    {
        HostRelation::Subdomain
    } else {
        HostRelation::External
    }
}

/// Extracts all admissible absolute URLs from a parsed document
///
/// Rules, in order:
/// 1. Fragment-only, `mailto:`, `tel:`, `javascript:`, and `data:` links
///    are ignored.
/// 2. Relative hrefs resolve against `page_url`; only http(s) results
///    survive.
/// 3. Host admission: same host always; subdomain relation when
///    `include_subdomains`; anything else when `follow_external_links`.
/// 4. A URL matching any `exclude_patterns` entry is rejected; when
///    `include_patterns` is non-empty a URL must match at least one
///    (exclude takes precedence).
///
/// Fragments are stripped from resolved URLs and duplicates within the
/// page are dropped, preserving first-seen order.
pub fn extract_links(
    document: &Html,
    page_url: &Url,
    seed_host: &str,
    policy: &CrawlPolicy,
) -> Vec<Url> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(url) = resolve_link(href, page_url) else {
            continue;
        };

        if !is_admissible(&url, seed_host, policy) {
            continue;
        }

        if seen.insert(url.as_str().to_string()) {
            links.push(url);
        }
    }

    links
}

/// Resolves an href to an absolute URL, or None if it should be dropped
///
/// Drops empty hrefs, fragment-only anchors, non-navigational schemes, and
/// anything that fails to resolve or resolves outside http(s).
fn resolve_link(href: &str, page_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut url = page_url.join(href).ok()?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    // Fragments never change the fetched resource
    url.set_fragment(None);

    Some(url)
}

/// Applies host classification and pattern filters to a resolved URL
fn is_admissible(url: &Url, seed_host: &str, policy: &CrawlPolicy) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };

    let host_ok = match classify_host(host, seed_host) {
        HostRelation::Same => true,
        HostRelation::Subdomain => policy.include_subdomains || policy.follow_external_links,
        HostRelation::External => policy.follow_external_links,
    };

    if !host_ok {
        return false;
    }

    let url_str = url.as_str();

    if policy
        .exclude_patterns
        .iter()
        .any(|pattern| url_str.contains(pattern.as_str()))
    {
        return false;
    }

    if !policy.include_patterns.is_empty()
        && !policy
            .include_patterns
            .iter()
            .any(|pattern| url_str.contains(pattern.as_str()))
    {
        return false;
    }

    true
}
