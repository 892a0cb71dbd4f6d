//! Run settings, loaded from a JSON file.
//!
//! Every field has a default, so a partial file (or none at all) is valid:
//!
//! ```json
//! {
//!   "fetch": { "timeout_secs": 60, "max_retries": 5 },
//!   "parsing": { "duplicate_headers": "reject" }
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::DuplicatePolicy;
use crate::fetch::retry::{RetryPolicy, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY};
use crate::fetch::sources::SourceUrls;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default pause between fetch attempts in seconds
pub const DEFAULT_RETRY_DELAY_SECS: f64 = 1.0;

/// Longest accepted pause between fetch attempts in seconds
pub const MAX_RETRY_DELAY_SECS: f64 = 3600.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid config value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Network settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_delay_secs: f64,
    pub urls: SourceUrls,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
            urls: SourceUrls::default(),
        }
    }
}

impl FetchSettings {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Retry policy with the delay clamped to `0..=MAX_RETRY_DELAY_SECS`
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        let delay = self.retry_delay_secs.clamp(0.0, MAX_RETRY_DELAY_SECS);
        RetryPolicy {
            max_retries: self.max_retries,
            retry_delay: Duration::try_from_secs_f64(delay).unwrap_or(DEFAULT_RETRY_DELAY),
        }
    }
}

/// Input parsing settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingSettings {
    pub duplicate_headers: DuplicatePolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fetch: FetchSettings,
    pub parsing: ParsingSettings,
}

impl Settings {
    /// Load settings from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, is not valid JSON,
    /// or holds an out-of-range value.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse settings from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for malformed JSON and
    /// `ConfigError::Invalid` for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let delay = self.fetch.retry_delay_secs;
        if !(0.0..=MAX_RETRY_DELAY_SECS).contains(&delay) {
            return Err(ConfigError::Invalid {
                field: "fetch.retry_delay_secs",
                message: format!("{delay} is not between 0 and {MAX_RETRY_DELAY_SECS} seconds"),
            });
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "fetch.timeout_secs",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.fetch.timeout(), Duration::from_secs(30));
        assert_eq!(settings.fetch.retry_policy(), RetryPolicy::default());
        assert_eq!(settings.parsing.duplicate_headers, DuplicatePolicy::KeepFirst);
        assert_eq!(settings.fetch.urls.rcsb_fasta, "https://www.rcsb.org/fasta/entry");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(
            r#"{"fetch": {"max_retries": 5, "retry_delay_secs": 0.25},
                "parsing": {"duplicate_headers": "keep_last"}}"#,
        )
        .unwrap();
        assert_eq!(settings.fetch.max_retries, 5);
        assert_eq!(settings.fetch.timeout_secs, 30);
        assert_eq!(
            settings.fetch.retry_policy().retry_delay,
            Duration::from_millis(250)
        );
        assert_eq!(settings.parsing.duplicate_headers, DuplicatePolicy::KeepLast);
        assert_eq!(settings.fetch.urls, SourceUrls::default());
    }

    #[test]
    fn test_empty_object() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Settings::from_json(r#"{"fetch": {"retry_delay_secs": -1.0}}"#),
            Err(ConfigError::Invalid { field: "fetch.retry_delay_secs", .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{"fetch": {"timeout_secs": 0}}"#),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{"parsing": {"duplicate_headers": "merge"}}"#),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_huge_retry_delay_rejected() {
        assert!(matches!(
            Settings::from_json(r#"{"fetch": {"retry_delay_secs": 1e30}}"#),
            Err(ConfigError::Invalid { field: "fetch.retry_delay_secs", .. })
        ));
        assert!(Settings::from_json(r#"{"fetch": {"retry_delay_secs": 3600}}"#).is_ok());
    }

    #[test]
    fn test_retry_policy_never_panics() {
        let mut fetch = FetchSettings::default();
        for delay in [1e30, f64::INFINITY, f64::NAN, -5.0] {
            fetch.retry_delay_secs = delay;
            assert!(fetch.retry_policy().retry_delay <= Duration::from_secs(3600));
        }
        fetch.retry_delay_secs = 1e30;
        assert_eq!(fetch.retry_policy().retry_delay, Duration::from_secs(3600));
    }

    #[test]
    fn test_load_from_file_round_trip() {
        let mut settings = Settings::default();
        settings.fetch.urls = SourceUrls::with_base("http://localhost:9000");

        let mut temp = NamedTempFile::with_suffix(".json").unwrap();
        temp.write_all(settings.to_json().unwrap().as_bytes()).unwrap();
        temp.flush().unwrap();

        assert_eq!(Settings::load_from_file(temp.path()).unwrap(), settings);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Settings::load_from_file(Path::new("/nonexistent/settings.json")),
            Err(ConfigError::ReadError(_))
        ));
    }
}
