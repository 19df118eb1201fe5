//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `LUMINA_API_URL` - Base URL of the store backend (e.g. `https://api.example.com/api/`)
//!
//! ## Optional
//! - `LUMINA_DATA_DIR` - Directory holding the local storage profile (default: `.lumina`)
//! - `LUMINA_HTTP_TIMEOUT_SECS` - Request timeout for backend calls (default: 15)
//! - `LUMINA_PRODUCT_CACHE_TTL_SECS` - How long product reads are cached (default: 300)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_DATA_DIR: &str = ".lumina";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
const DEFAULT_PRODUCT_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, always ending in `/` so relative paths join under it
    pub api_url: Url,
    /// Directory for the file-backed storage profile
    pub data_dir: PathBuf,
    /// Timeout applied to every backend request
    pub http_timeout: Duration,
    /// Time-to-live for cached product reads
    pub product_cache_ttl: Duration,
}

impl ClientConfig {
    /// Build a configuration with defaults for everything except the API URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `api_url` is not a valid
    /// http(s) URL.
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            product_cache_ttl: Duration::from_secs(DEFAULT_PRODUCT_CACHE_TTL_SECS),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("LUMINA_API_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("LUMINA_API_URL".to_string()))?;

        let mut config = Self::new(&api_url)?;

        if let Some(dir) = lookup("LUMINA_DATA_DIR").filter(|d| !d.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(secs) = lookup("LUMINA_HTTP_TIMEOUT_SECS") {
            config.http_timeout = parse_secs("LUMINA_HTTP_TIMEOUT_SECS", &secs)?;
        }
        if let Some(secs) = lookup("LUMINA_PRODUCT_CACHE_TTL_SECS") {
            config.product_cache_ttl = parse_secs("LUMINA_PRODUCT_CACHE_TTL_SECS", &secs)?;
        }

        Ok(config)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse the backend URL, ensuring a trailing slash.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("LUMINA_API_URL".to_string(), msg);

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Parse a positive number of seconds.
fn parse_secs(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        )),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_url() {
        let err = ClientConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "LUMINA_API_URL"));
    }

    #[test]
    fn test_defaults() {
        let config =
            ClientConfig::from_lookup(lookup_from(&[("LUMINA_API_URL", "http://localhost:5000/api")]))
                .unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:5000/api/");
        assert_eq!(config.data_dir, PathBuf::from(".lumina"));
        assert_eq!(config.http_timeout, Duration::from_secs(15));
        assert_eq!(config.product_cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_trailing_slash_preserved() {
        let config = ClientConfig::new("https://shop.example.com/api/").unwrap();
        assert_eq!(config.api_url.as_str(), "https://shop.example.com/api/");
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("LUMINA_API_URL", "https://shop.example.com/"),
            ("LUMINA_DATA_DIR", "/tmp/lumina-profile"),
            ("LUMINA_HTTP_TIMEOUT_SECS", "3"),
            ("LUMINA_PRODUCT_CACHE_TTL_SECS", "60"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/lumina-profile"));
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert_eq!(config.product_cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            ClientConfig::new("ftp://files.example.com"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(matches!(
            ClientConfig::new("not a url"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));

        let err = ClientConfig::from_lookup(lookup_from(&[
            ("LUMINA_API_URL", "https://shop.example.com/"),
            ("LUMINA_HTTP_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "LUMINA_HTTP_TIMEOUT_SECS"));
    }
}
