use crate::policy::types::CrawlPolicy;
use crate::PolicyError;
use url::Url;

/// Validates a crawl policy at the invocation boundary
///
/// The engine itself never re-validates: a `CrawlPolicy` that passed this
/// function is trusted everywhere downstream.
pub fn validate(policy: &CrawlPolicy) -> Result<(), PolicyError> {
    validate_seed_url(&policy.url)?;
    validate_limits(policy)?;
    validate_headers(policy)?;
    Ok(())
}

/// Validates the seed URL: well-formed, http(s), and has a host
fn validate_seed_url(url: &str) -> Result<(), PolicyError> {
    let parsed =
        Url::parse(url).map_err(|e| PolicyError::InvalidUrl(format!("'{}': {}", url, e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(PolicyError::InvalidUrl(format!(
            "'{}': scheme must be http or https, got '{}'",
            url,
            parsed.scheme()
        )));
    }

    if parsed.host_str().is_none() {
        return Err(PolicyError::InvalidUrl(format!("'{}': missing host", url)));
    }

    Ok(())
}

/// Validates the numeric limit fields against their documented ranges
fn validate_limits(policy: &CrawlPolicy) -> Result<(), PolicyError> {
    if policy.max_depth < 1 || policy.max_depth > 5 {
        return Err(PolicyError::Validation(format!(
            "max_depth must be between 1 and 5, got {}",
            policy.max_depth
        )));
    }

    if policy.max_pages < 1 || policy.max_pages > 100 {
        return Err(PolicyError::Validation(format!(
            "max_pages must be between 1 and 100, got {}",
            policy.max_pages
        )));
    }

    if policy.timeout_seconds < 5 || policy.timeout_seconds > 120 {
        return Err(PolicyError::Validation(format!(
            "timeout_seconds must be between 5 and 120, got {}",
            policy.timeout_seconds
        )));
    }

    if policy.word_count_threshold > 1000 {
        return Err(PolicyError::Validation(format!(
            "word_count_threshold must be between 0 and 1000, got {}",
            policy.word_count_threshold
        )));
    }

    Ok(())
}

/// Validates custom header names and values
///
/// reqwest rejects invalid headers at client-build time with an opaque
/// error; catching them here keeps the failure at the boundary where it
/// can be reported against the offending entry.
fn validate_headers(policy: &CrawlPolicy) -> Result<(), PolicyError> {
    for (name, value) in &policy.custom_headers {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(PolicyError::Validation(format!(
                "invalid header name '{}'",
                name
            )));
        }

        if value.chars().any(|c| c == '\r' || c == '\n') {
            return Err(PolicyError::Validation(format!(
                "header '{}' value contains line breaks",
                name
            )));
        }
    }

    Ok(())
}
