//! Environment configuration for Finline.
//!
//! All runtime configuration is consumed from the process environment;
//! secrets are wrapped in [`SecretString`] so they never appear in Debug
//! output or logs.

use std::path::PathBuf;

use secrecy::SecretString;

/// Default LINE API base; overridable for tests and proxies.
const DEFAULT_LINE_BASE_URL: &str = "https://api.line.me";

/// Default path of the stock code→name table.
const DEFAULT_STOCK_NAMES_PATH: &str = "name_df.csv";

/// Errors from configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required config key: {0}")]
    MissingKey(&'static str),
}

/// Runtime configuration.
pub struct Config {
    /// LINE API base URL (`BASE_URL`).
    pub line_base_url: String,
    /// LINE channel access token (`CHANNEL_ACCESS_TOKEN`).
    pub channel_access_token: SecretString,
    /// LINE channel secret for webhook signatures (`CHANNEL_SECRET`).
    pub channel_secret: SecretString,
    /// Groq API key (`GROQ_API_KEY`).
    pub groq_api_key: SecretString,
    /// Path of the stock code→name CSV (`STOCK_NAMES_PATH`).
    pub stock_names_path: PathBuf,
}

// Config intentionally does NOT derive Debug to prevent accidental exposure
// of credentials in logs.

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup (tests inject a
    /// closure instead of mutating the process environment).
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| -> Result<SecretString, ConfigError> {
            lookup(key)
                .filter(|v| !v.is_empty())
                .map(SecretString::from)
                .ok_or(ConfigError::MissingKey(key))
        };

        Ok(Self {
            line_base_url: lookup("BASE_URL")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_LINE_BASE_URL.to_string()),
            channel_access_token: required("CHANNEL_ACCESS_TOKEN")?,
            channel_secret: required("CHANNEL_SECRET")?,
            groq_api_key: required("GROQ_API_KEY")?,
            stock_names_path: lookup("STOCK_NAMES_PATH")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STOCK_NAMES_PATH)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_env(key: &str) -> Option<String> {
        match key {
            "BASE_URL" => Some("https://line.example.test".to_string()),
            "CHANNEL_ACCESS_TOKEN" => Some("token".to_string()),
            "CHANNEL_SECRET" => Some("secret".to_string()),
            "GROQ_API_KEY" => Some("gsk_test".to_string()),
            "STOCK_NAMES_PATH" => Some("/data/names.csv".to_string()),
            _ => None,
        }
    }

    #[test]
    fn loads_all_keys() {
        let config = Config::from_lookup(full_env).unwrap();
        assert_eq!(config.line_base_url, "https://line.example.test");
        assert_eq!(config.stock_names_path, PathBuf::from("/data/names.csv"));
    }

    #[test]
    fn optional_keys_fall_back_to_defaults() {
        let config = Config::from_lookup(|key| match key {
            "CHANNEL_ACCESS_TOKEN" | "CHANNEL_SECRET" | "GROQ_API_KEY" => {
                Some("x".to_string())
            }
            _ => None,
        })
        .unwrap();
        assert_eq!(config.line_base_url, DEFAULT_LINE_BASE_URL);
        assert_eq!(
            config.stock_names_path,
            PathBuf::from(DEFAULT_STOCK_NAMES_PATH)
        );
    }

    #[test]
    fn missing_required_key_is_a_typed_error() {
        let result = Config::from_lookup(|key| match key {
            "CHANNEL_ACCESS_TOKEN" | "GROQ_API_KEY" => Some("x".to_string()),
            _ => None,
        });
        match result {
            Err(ConfigError::MissingKey(key)) => assert_eq!(key, "CHANNEL_SECRET"),
            other => panic!("expected MissingKey, got {:?}", other.err()),
        }
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let result = Config::from_lookup(|key| match key {
            "CHANNEL_ACCESS_TOKEN" => Some(String::new()),
            "CHANNEL_SECRET" | "GROQ_API_KEY" => Some("x".to_string()),
            _ => None,
        });
        assert!(matches!(
            result,
            Err(ConfigError::MissingKey("CHANNEL_ACCESS_TOKEN"))
        ));
    }
}
