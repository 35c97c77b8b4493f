//! Configuration management for the LeafScan client
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with LEAFSCAN_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Validate)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Inference service configuration
    #[validate]
    pub api: ApiConfig,

    /// Retry policy for transport failures
    #[validate]
    pub retry: RetryConfig,

    /// Local persistence
    pub storage: StorageConfig,

    /// Answer predictions in-process instead of calling the service
    pub use_mock_service: bool,

    /// Simulated latency of the mock service
    pub mock_latency_ms: u64,
}

/// How image bytes travel to the service
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UploadEncoding {
    #[default]
    Multipart,
    Base64,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct ApiConfig {
    /// Base URL of the inference service
    #[validate(url)]
    pub base_url: String,

    /// Per-request timeout in milliseconds
    #[validate(range(min = 1, max = 600000))]
    pub timeout_ms: u64,

    /// Per-crop prediction path; `{crop}` is replaced by the crop name
    #[validate(length(min = 1))]
    pub prediction_path: String,

    pub auto_detect_path: String,
    pub health_path: String,
    pub model_status_path: String,

    pub upload_encoding: UploadEncoding,

    /// Multipart form field carrying the image
    #[validate(length(min = 1))]
    pub upload_field: String,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct RetryConfig {
    /// Total attempts including the first one
    #[validate(range(min = 1, max = 10))]
    pub max_attempts: u32,

    /// Fixed delay between attempts
    pub delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// JSON file backing saved results and the onboarding flag
    pub path: PathBuf,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("LEAFSCAN_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let api = ApiConfig::default();
        let retry = RetryConfig::default();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("api.base_url", api.base_url)?
            .set_default("api.timeout_ms", api.timeout_ms)?
            .set_default("api.prediction_path", api.prediction_path)?
            .set_default("api.auto_detect_path", api.auto_detect_path)?
            .set_default("api.health_path", api.health_path)?
            .set_default("api.model_status_path", api.model_status_path)?
            .set_default("api.upload_encoding", "multipart")?
            .set_default("api.upload_field", api.upload_field)?
            .set_default("retry.max_attempts", retry.max_attempts)?
            .set_default("retry.delay_ms", retry.delay_ms)?
            .set_default("storage.path", "data/leafscan.json")?
            .set_default("use_mock_service", false)?
            .set_default("mock_latency_ms", 2000)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (LEAFSCAN_ prefix)
            .add_source(
                Environment::with_prefix("LEAFSCAN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(config)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 30_000,
            prediction_path: "/predict/{crop}".to_string(),
            auto_detect_path: "/detect/auto".to_string(),
            health_path: "/health".to_string(),
            model_status_path: "/models/status".to_string(),
            upload_encoding: UploadEncoding::Multipart,
            upload_field: "file".to_string(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            environment: "test".into(),
            api: ApiConfig::default(),
            retry: RetryConfig::default(),
            storage: StorageConfig {
                path: "leafscan.json".into(),
            },
            use_mock_service: false,
            mock_latency_ms: 0,
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(config().validate().is_ok());
        assert_eq!(ApiConfig::default().timeout_ms, 30_000);
        assert_eq!(RetryConfig::default().max_attempts, 3);
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut config = config();
        config.api.base_url = "not a url".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = config();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_upload_encoding_parses_lowercase() {
        let encoding: UploadEncoding = serde_json::from_str("\"base64\"").unwrap();
        assert_eq!(encoding, UploadEncoding::Base64);
    }

    #[test]
    fn test_env_overrides_nested_keys() {
        std::env::set_var("LEAFSCAN_API__BASE_URL", "http://inference.test:9000");
        std::env::set_var("LEAFSCAN_RETRY__MAX_ATTEMPTS", "5");
        let loaded = Config::load();
        std::env::remove_var("LEAFSCAN_API__BASE_URL");
        std::env::remove_var("LEAFSCAN_RETRY__MAX_ATTEMPTS");

        let loaded = loaded.unwrap();
        assert_eq!(loaded.api.base_url, "http://inference.test:9000");
        assert_eq!(loaded.retry.max_attempts, 5);
        assert_eq!(loaded.api.upload_field, "file");
    }
}
