use serde::Deserialize;
use std::collections::HashMap;

/// Immutable crawl policy, one per crawl invocation
///
/// All numeric fields are validated to be within their documented ranges
/// before the engine runs; the engine trusts them and never re-validates.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlPolicy {
    /// Seed URL the crawl starts from
    pub url: String,

    /// Maximum link depth from the seed (1-5); the seed itself is depth 0
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of successfully crawled pages (1-100)
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Whether to follow links to subdomains of the seed host
    #[serde(rename = "include-subdomains", default)]
    pub include_subdomains: bool,

    /// Whether to follow links to unrelated hosts
    #[serde(rename = "follow-external-links", default)]
    pub follow_external_links: bool,

    /// Advisory selector to wait for before extraction; the static pipeline
    /// logs it and moves on (it only matters to rendering strategies)
    #[serde(rename = "wait-for-selector", default)]
    pub wait_for_selector: Option<String>,

    /// URLs matching any of these substrings are never followed
    #[serde(rename = "exclude-patterns", default)]
    pub exclude_patterns: Vec<String>,

    /// When non-empty, only URLs matching at least one substring are followed
    #[serde(rename = "include-patterns", default)]
    pub include_patterns: Vec<String>,

    /// Extra request headers sent with every fetch
    #[serde(rename = "custom-headers", default)]
    pub custom_headers: HashMap<String, String>,

    /// Per-fetch timeout in seconds (5-120)
    #[serde(rename = "timeout-seconds", default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Whether images are considered content at all
    #[serde(rename = "extract-images", default = "default_true")]
    pub extract_images: bool,

    /// Whether tables are considered content at all
    #[serde(rename = "extract-tables", default = "default_true")]
    pub extract_tables: bool,

    /// Minimum words per markdown line (0-1000); lines below are dropped
    #[serde(rename = "word-count-threshold", default)]
    pub word_count_threshold: u32,

    /// Whether to locate the main-content region instead of the whole body
    #[serde(rename = "only-main-content", default = "default_true")]
    pub only_main_content: bool,

    /// Suppress markdown image syntax in the converted output
    #[serde(rename = "remove-images", default)]
    pub remove_images: bool,

    /// Suppress markdown link syntax in the converted output
    #[serde(rename = "remove-links", default)]
    pub remove_links: bool,
}

fn default_max_depth() -> u32 {
    2
}

fn default_max_pages() -> u32 {
    10
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl CrawlPolicy {
    /// Creates a policy for a URL with every other field at its default
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_depth: default_max_depth(),
            max_pages: default_max_pages(),
            include_subdomains: false,
            follow_external_links: false,
            wait_for_selector: None,
            exclude_patterns: Vec::new(),
            include_patterns: Vec::new(),
            custom_headers: HashMap::new(),
            timeout_seconds: default_timeout_seconds(),
            extract_images: true,
            extract_tables: true,
            word_count_threshold: 0,
            only_main_content: true,
            remove_images: false,
            remove_links: false,
        }
    }
}
