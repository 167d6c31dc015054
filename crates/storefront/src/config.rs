//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ZAHAB_HOST` - Bind address (default: 127.0.0.1)
//! - `ZAHAB_PORT` - Listen port (default: 3000)
//! - `GOLDAPI_KEY` - Access token for the primary gold-price provider.
//!   When unset the primary provider is skipped entirely.
//! - `GOLDAPI_URL` - Primary provider endpoint (default: the real GoldAPI
//!   XAU/AED endpoint)
//! - `COINGECKO_URL` - Secondary provider endpoint (default: the real
//!   CoinGecko simple-price endpoint)
//! - `PROVIDER_TIMEOUT_SECS` - Per-provider-call HTTP timeout (default: 10)
//! - `ZAHAB_CORS_ORIGINS` - Comma-separated allowed origins (default: empty,
//!   meaning any origin)
//! - `ANALYTICS_QUEUE_CAPACITY` - Bounded capacity of the activity sink
//!   channel (default: 1024)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Default primary provider endpoint: AED-denominated gold spot.
const DEFAULT_GOLDAPI_URL: &str = "https://www.goldapi.io/api/XAU/AED";

/// Default secondary provider endpoint: USD-denominated PAX Gold price.
const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3/simple/price";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
///
/// Fields are public so tests can construct configurations directly
/// (pointing the providers at local stubs) without touching the process
/// environment.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Price provider configuration
    pub providers: ProviderConfig,
    /// Comma-separated CORS allow-list; empty means any origin
    pub cors_origins: Vec<String>,
    /// Bounded capacity of the activity sink channel
    pub analytics_queue_capacity: usize,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Price provider configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Primary provider endpoint (AED per troy ounce)
    pub goldapi_url: String,
    /// Primary provider access token; the primary tier is skipped when unset
    pub goldapi_key: Option<SecretString>,
    /// Secondary provider endpoint (USD per troy ounce)
    pub coingecko_url: String,
    /// Per-provider-call HTTP timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("goldapi_url", &self.goldapi_url)
            .field(
                "goldapi_key",
                &self.goldapi_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("coingecko_url", &self.coingecko_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ZAHAB_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ZAHAB_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ZAHAB_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ZAHAB_PORT".to_string(), e.to_string()))?;

        let providers = ProviderConfig::from_env()?;

        let cors_origins = get_optional_env("ZAHAB_CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let analytics_queue_capacity = get_env_or_default("ANALYTICS_QUEUE_CAPACITY", "1024")
            .parse::<usize>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ANALYTICS_QUEUE_CAPACITY".to_string(), e.to_string())
            })?;

        Ok(Self {
            host,
            port,
            providers,
            cors_origins,
            analytics_queue_capacity,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ProviderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = get_env_or_default("PROVIDER_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PROVIDER_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            goldapi_url: get_env_or_default("GOLDAPI_URL", DEFAULT_GOLDAPI_URL),
            goldapi_key: get_optional_env("GOLDAPI_KEY").map(SecretString::from),
            coingecko_url: get_env_or_default("COINGECKO_URL", DEFAULT_COINGECKO_URL),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            providers: ProviderConfig {
                goldapi_url: DEFAULT_GOLDAPI_URL.to_string(),
                goldapi_key: Some(SecretString::from("gapi-test-token")),
                coingecko_url: DEFAULT_COINGECKO_URL.to_string(),
                timeout: Duration::from_secs(10),
            },
            cors_origins: vec![],
            analytics_queue_capacity: 1024,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_provider_config_debug_redacts_key() {
        let config = test_config();
        let debug_output = format!("{:?}", config.providers);

        assert!(debug_output.contains(DEFAULT_GOLDAPI_URL));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("gapi-test-token"));
    }

    #[test]
    fn test_get_env_or_default_falls_back() {
        let value = get_env_or_default("ZAHAB_TEST_UNSET_VARIABLE", "fallback");
        assert_eq!(value, "fallback");
    }
}
