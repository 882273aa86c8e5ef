use crate::policy::types::CrawlPolicy;
use crate::policy::validation::validate;
use crate::PolicyError;
use std::path::Path;

/// Loads and validates a crawl policy from a TOML file
///
/// # Arguments
///
/// * `path` - Path to the TOML policy file
///
/// # Returns
///
/// * `Ok(CrawlPolicy)` - Successfully loaded and validated policy
/// * `Err(PolicyError)` - Failed to read, parse, or validate the policy
pub fn load_policy(path: &Path) -> Result<CrawlPolicy, PolicyError> {
    let content = std::fs::read_to_string(path)?;

    let policy: CrawlPolicy = toml::from_str(&content)?;

    validate(&policy)?;

    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_policy(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_policy() {
        let file = create_temp_policy(
            r#"
url = "https://example.com/docs"
max-depth = 3
max-pages = 20
include-subdomains = true
"#,
        );

        let policy = load_policy(file.path()).unwrap();
        assert_eq!(policy.url, "https://example.com/docs");
        assert_eq!(policy.max_depth, 3);
        assert_eq!(policy.max_pages, 20);
        assert!(policy.include_subdomains);
    }

    #[test]
    fn test_load_policy_with_invalid_path() {
        let result = load_policy(Path::new("/nonexistent/policy.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_policy_with_invalid_toml() {
        let file = create_temp_policy("this is not valid TOML {{{");
        let result = load_policy(file.path());
        assert!(matches!(result, Err(PolicyError::Parse(_))));
    }

    #[test]
    fn test_load_policy_with_validation_error() {
        let file = create_temp_policy(
            r#"
url = "https://example.com/"
max-depth = 9
"#,
        );
        let result = load_policy(file.path());
        assert!(matches!(result, Err(PolicyError::Validation(_))));
    }
}
