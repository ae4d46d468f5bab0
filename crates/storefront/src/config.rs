//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional and fall back to defaults:
//! - `VETRINA_API_BASE_URL` - Base URL of the remote catalog service
//!   (default: `https://fakestoreapi.com`)
//! - `VETRINA_DATA_DIR` - Directory for durable state slots (default: `.vetrina`)
//! - `VETRINA_REQUEST_TIMEOUT_SECS` - HTTP request timeout (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default base URL of the remote catalog service.
const DEFAULT_API_BASE_URL: &str = "https://fakestoreapi.com";

/// Default directory for durable state slots.
const DEFAULT_DATA_DIR: &str = ".vetrina";

/// Default HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the remote catalog service
    pub api_base_url: String,
    /// Directory where durable state slots are stored
    pub data_dir: PathBuf,
    /// Timeout applied to every remote request
    pub request_timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_env_or_default("VETRINA_API_BASE_URL", DEFAULT_API_BASE_URL);
        let data_dir = PathBuf::from(get_env_or_default("VETRINA_DATA_DIR", DEFAULT_DATA_DIR));
        let timeout_secs = get_env_or_default(
            "VETRINA_REQUEST_TIMEOUT_SECS",
            &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("VETRINA_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_base_url,
            data_dir,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
