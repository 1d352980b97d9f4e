// src/config.rs
use crate::classify::{SOFTWARE_JOB_KEYWORDS, STRONG_CONTENT_KEYWORDS};
use crate::data_model::FetchMode;
use crate::error::{Result, ScrapeError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Run-wide scraper configuration, read from YAML. Every field has a
/// default, so a missing file (or an empty one) means "run with defaults".
#[derive(Deserialize, Debug, Clone)]
pub struct ScraperConfig {
    /// Which fetch path to use for the whole batch.
    #[serde(default)]
    pub fetch_mode: FetchMode,

    /// Deadline for one static HTTP GET.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Navigation attempts per URL in dynamic mode.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Jittered backoff range between dynamic attempts, `[lo, hi]` ms.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: (u64, u64),

    /// Budget for the readiness-selector wait of one dynamic attempt.
    #[serde(default = "default_readiness_timeout_ms")]
    pub readiness_timeout_ms: u64,

    /// Settle range applied when no readiness selector fires, `[lo, hi]` ms.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: (u64, u64),

    /// Randomized pause between dynamic navigations, `[lo, hi]` ms.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: (u64, u64),

    /// Rendered documents shorter than this many chars are treated as a
    /// blocked or empty render and retried.
    #[serde(default = "default_min_page_length")]
    pub min_page_length: usize,

    /// Hard cap on extracted content length, in chars.
    #[serde(default = "default_content_truncation_limit")]
    pub content_truncation_limit: usize,

    /// Overrides the built-in spoofed browser identity.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Overrides the built-in classification dictionary.
    #[serde(default)]
    pub keywords: Option<Vec<String>>,

    /// Overrides the built-in strong-keyword lexicon.
    #[serde(default)]
    pub strong_keywords: Option<Vec<String>>,
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff_ms() -> (u64, u64) {
    (3_000, 8_000)
}

fn default_readiness_timeout_ms() -> u64 {
    15_000
}

fn default_settle_delay_ms() -> (u64, u64) {
    (2_000, 5_000)
}

fn default_request_delay_ms() -> (u64, u64) {
    (500, 2_500)
}

fn default_min_page_length() -> usize {
    1_000
}

fn default_content_truncation_limit() -> usize {
    4_000
}

impl Default for ScraperConfig {
    fn default() -> Self {
        ScraperConfig {
            fetch_mode: FetchMode::default(),
            request_timeout_ms: default_request_timeout_ms(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            readiness_timeout_ms: default_readiness_timeout_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            request_delay_ms: default_request_delay_ms(),
            min_page_length: default_min_page_length(),
            content_truncation_limit: default_content_truncation_limit(),
            user_agent: None,
            keywords: None,
            strong_keywords: None,
        }
    }
}

impl ScraperConfig {
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_ms == 0 {
            return Err(ScrapeError::ConfigValidationError(
                "ScraperConfig: request_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.readiness_timeout_ms == 0 {
            return Err(ScrapeError::ConfigValidationError(
                "ScraperConfig: readiness_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.max_retries == 0 {
            return Err(ScrapeError::ConfigValidationError(
                "ScraperConfig: max_retries must be greater than 0".to_string(),
            ));
        }
        for (name, (lo, hi)) in [
            ("retry_backoff_ms", self.retry_backoff_ms),
            ("settle_delay_ms", self.settle_delay_ms),
            ("request_delay_ms", self.request_delay_ms),
        ] {
            if lo > hi {
                return Err(ScrapeError::ConfigValidationError(format!(
                    "ScraperConfig: {} range start ({}) cannot be greater than end ({})",
                    name, lo, hi
                )));
            }
        }
        if self.min_page_length == 0 {
            return Err(ScrapeError::ConfigValidationError(
                "ScraperConfig: min_page_length must be greater than 0".to_string(),
            ));
        }
        if self.content_truncation_limit == 0 {
            return Err(ScrapeError::ConfigValidationError(
                "ScraperConfig: content_truncation_limit must be greater than 0".to_string(),
            ));
        }
        for (name, list) in [
            ("keywords", &self.keywords),
            ("strong_keywords", &self.strong_keywords),
        ] {
            if let Some(entries) = list {
                if entries.is_empty() {
                    return Err(ScrapeError::ConfigValidationError(format!(
                        "ScraperConfig: {} cannot be an empty list",
                        name
                    )));
                }
                if entries.iter().any(|k| k.trim().is_empty()) {
                    return Err(ScrapeError::ConfigValidationError(format!(
                        "ScraperConfig: {} cannot contain blank entries",
                        name
                    )));
                }
            }
        }
        Ok(())
    }

    /// The classification dictionary for this run: the configured list, or
    /// the built-in one. Immutable once handed to the classifier.
    pub fn keyword_dictionary(&self) -> Vec<String> {
        match &self.keywords {
            Some(list) => list.clone(),
            None => SOFTWARE_JOB_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The strong-keyword lexicon for this run.
    pub fn strong_keyword_lexicon(&self) -> Vec<String> {
        match &self.strong_keywords {
            Some(list) => list.clone(),
            None => STRONG_CONTENT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Loads, parses and validates the scraper configuration YAML file.
pub fn load_scraper_config<P: AsRef<Path>>(config_path: P) -> Result<ScraperConfig> {
    let path_ref = config_path.as_ref();
    let config_content = fs::read_to_string(path_ref).map_err(|e| {
        ScrapeError::ConfigError(format!(
            "Failed to read scraper config file '{}': {}",
            path_ref.display(),
            e
        ))
    })?;

    let config: ScraperConfig = serde_yaml::from_str(&config_content).map_err(|e| {
        ScrapeError::ConfigError(format!(
            "Failed to parse scraper config YAML from '{}': {}",
            path_ref.display(),
            e
        ))
    })?;

    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config_file(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(temp_file, "{}", content).expect("Failed to write to temp file");
        temp_file
    }

    macro_rules! assert_config_validation_error {
        ($result:expr, $expected_msg_part:expr) => {
            match $result {
                Err(ScrapeError::ConfigValidationError(msg)) => {
                    assert!(
                        msg.contains($expected_msg_part),
                        "Error message '{}' did not contain '{}'",
                        msg,
                        $expected_msg_part
                    );
                }
                Err(other_err) => {
                    panic!(
                        "Expected ConfigValidationError, but got different error: {:?}",
                        other_err
                    );
                }
                Ok(_) => {
                    panic!("Expected error, but got Ok");
                }
            }
        };
    }

    #[test]
    fn test_load_valid_config() {
        let yaml_content = r#"
fetch_mode: dynamic
request_timeout_ms: 5000
max_retries: 2
retry_backoff_ms: [1000, 2000]
min_page_length: 500
keywords: ["软件开发", "Java"]
        "#;
        let temp_file = create_temp_config_file(yaml_content);
        let config_result = load_scraper_config(temp_file.path());

        assert!(
            config_result.is_ok(),
            "Should load valid config: {:?}",
            config_result.err()
        );
        let config = config_result.unwrap();
        assert_eq!(config.fetch_mode, FetchMode::Dynamic);
        assert_eq!(config.request_timeout_ms, 5000);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.retry_backoff_ms, (1000, 2000));
        assert_eq!(config.min_page_length, 500);
        // Unspecified fields fall back to defaults.
        assert_eq!(config.content_truncation_limit, 4000);
        assert_eq!(config.readiness_timeout_ms, 15_000);
        assert_eq!(
            config.keyword_dictionary(),
            vec!["软件开发".to_string(), "Java".to_string()]
        );
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_scraper_config("non_existent_config.yaml");
        assert!(result.is_err());
        match result.err().unwrap() {
            ScrapeError::ConfigError(msg) => {
                assert!(msg.contains("Failed to read scraper config file"));
                assert!(msg.contains("non_existent_config.yaml"));
            }
            _ => panic!("Expected ConfigError for non-existent file"),
        }
    }

    #[test]
    fn test_load_invalid_yaml_syntax() {
        let yaml_content = r#"
fetch_mode: static
retry_backoff_ms [3000, 8000]
        "#;
        let temp_file = create_temp_config_file(yaml_content);
        let result = load_scraper_config(temp_file.path());

        assert!(result.is_err(), "Should fail for invalid YAML syntax");
        match result.err().unwrap() {
            ScrapeError::ConfigError(msg) => {
                assert!(msg.contains("Failed to parse scraper config YAML"));
            }
            _ => panic!("Expected ConfigError for invalid YAML syntax"),
        }
    }

    #[test]
    fn test_load_empty_mapping_uses_defaults() {
        let temp_file = create_temp_config_file("{}");
        let config = load_scraper_config(temp_file.path()).expect("empty mapping is valid");
        assert_eq!(config.fetch_mode, FetchMode::Static);
        assert_eq!(config.request_timeout_ms, 10_000);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_backoff_ms, (3_000, 8_000));
        assert_eq!(config.min_page_length, 1_000);
        assert!(config.keywords.is_none());
        assert!(!config.keyword_dictionary().is_empty());
        assert!(!config.strong_keyword_lexicon().is_empty());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ScraperConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_request_timeout() {
        let config = ScraperConfig {
            request_timeout_ms: 0,
            ..ScraperConfig::default()
        };
        assert_config_validation_error!(config.validate(), "request_timeout_ms");
    }

    #[test]
    fn test_validate_zero_max_retries() {
        let config = ScraperConfig {
            max_retries: 0,
            ..ScraperConfig::default()
        };
        assert_config_validation_error!(config.validate(), "max_retries");
    }

    #[test]
    fn test_validate_inverted_backoff_range() {
        let config = ScraperConfig {
            retry_backoff_ms: (8_000, 3_000),
            ..ScraperConfig::default()
        };
        assert_config_validation_error!(config.validate(), "retry_backoff_ms");
    }

    #[test]
    fn test_validate_inverted_settle_range() {
        let config = ScraperConfig {
            settle_delay_ms: (5_000, 2_000),
            ..ScraperConfig::default()
        };
        assert_config_validation_error!(config.validate(), "settle_delay_ms");
    }

    #[test]
    fn test_validate_zero_min_page_length() {
        let config = ScraperConfig {
            min_page_length: 0,
            ..ScraperConfig::default()
        };
        assert_config_validation_error!(config.validate(), "min_page_length");
    }

    #[test]
    fn test_validate_zero_truncation_limit() {
        let config = ScraperConfig {
            content_truncation_limit: 0,
            ..ScraperConfig::default()
        };
        assert_config_validation_error!(config.validate(), "content_truncation_limit");
    }

    #[test]
    fn test_validate_empty_keyword_list() {
        let config = ScraperConfig {
            keywords: Some(vec![]),
            ..ScraperConfig::default()
        };
        assert_config_validation_error!(config.validate(), "keywords cannot be an empty list");
    }

    #[test]
    fn test_validate_blank_keyword_entry() {
        let config = ScraperConfig {
            strong_keywords: Some(vec!["编程".to_string(), "   ".to_string()]),
            ..ScraperConfig::default()
        };
        assert_config_validation_error!(config.validate(), "strong_keywords cannot contain blank entries");
    }
}
