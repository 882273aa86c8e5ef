//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawl engine:
//! - Building an HTTP client from the policy's headers and timeout
//! - Fetching single pages with a content-type guard
//! - Classifying failures so the traversal controller can decide whether
//!   they are fatal (seed) or skippable (everything else)

use crate::policy::CrawlPolicy;
use crate::{PolicyError, SitemarkError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;

/// Result of fetching a single page
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body
        body: String,
    },

    /// The server answered with a non-success status
    HttpStatus {
        /// The HTTP status code
        status_code: u16,
    },

    /// The response is not HTML
    ContentMismatch {
        /// The Content-Type received
        content_type: String,
    },

    /// The request never completed (timeout, refused connection, ...)
    Network {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Short human-readable description of a failed fetch
    ///
    /// Success has no failure description.
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            FetchResult::Success { .. } => None,
            FetchResult::HttpStatus { status_code } => Some(format!("HTTP {}", status_code)),
            FetchResult::ContentMismatch { content_type } => {
                Some(format!("expected HTML, got {}", content_type))
            }
            FetchResult::Network { error } => Some(error.clone()),
        }
    }
}

/// Builds an HTTP client configured from the crawl policy
///
/// Applies the policy's custom headers as default headers and its
/// per-fetch timeout. Redirects are followed (reqwest's default, up to 10
/// hops); the final URL is reported on each fetch.
pub fn build_http_client(policy: &CrawlPolicy) -> Result<Client, SitemarkError> {
    let mut headers = HeaderMap::new();
    for (name, value) in &policy.custom_headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| PolicyError::Validation(format!("invalid header name '{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            PolicyError::Validation(format!("invalid header value for '{}': {}", name, e))
        })?;
        headers.insert(name, value);
    }

    let client = Client::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .default_headers(headers)
        .timeout(Duration::from_secs(policy.timeout_seconds))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetches a single URL and classifies the outcome
///
/// A response counts as success only when the status is 2xx and the
/// Content-Type is HTML (a missing Content-Type is assumed HTML). Network
/// errors are classified into a short description; the caller decides
/// whether the failure is fatal.
pub async fn fetch_page(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "request timeout".to_string()
            } else if e.is_connect() {
                "connection failed".to_string()
            } else {
                e.to_string()
            };
            return FetchResult::Network { error };
        }
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return FetchResult::HttpStatus {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.is_empty()
        && !content_type.contains("text/html")
        && !content_type.contains("application/xhtml")
    {
        return FetchResult::ContentMismatch { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::Network {
            error: format!("failed to read body: {}", e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let policy = CrawlPolicy::for_url("https://example.com/");
        assert!(build_http_client(&policy).is_ok());
    }

    #[test]
    fn test_build_http_client_with_custom_headers() {
        let mut policy = CrawlPolicy::for_url("https://example.com/");
        policy
            .custom_headers
            .insert("X-Custom".to_string(), "value".to_string());
        assert!(build_http_client(&policy).is_ok());
    }

    #[test]
    fn test_build_http_client_rejects_invalid_header() {
        let mut policy = CrawlPolicy::for_url("https://example.com/");
        policy
            .custom_headers
            .insert("bad name".to_string(), "value".to_string());
        assert!(build_http_client(&policy).is_err());
    }

    #[test]
    fn test_failure_reasons() {
        assert_eq!(
            FetchResult::HttpStatus { status_code: 404 }.failure_reason(),
            Some("HTTP 404".to_string())
        );
        assert_eq!(
            FetchResult::ContentMismatch {
                content_type: "application/pdf".to_string()
            }
            .failure_reason(),
            Some("expected HTML, got application/pdf".to_string())
        );
        assert!(FetchResult::Success {
            final_url: "https://example.com/".to_string(),
            status_code: 200,
            body: String::new()
        }
        .failure_reason()
        .is_none());
    }
}
