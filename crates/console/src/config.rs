//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CONSOLE_BASE_URL` - Public URL for the console
//! - `BACKEND_URL` - Base URL of the managed relational backend
//! - `BACKEND_SERVICE_KEY` - Service key for backend RPC calls (high entropy)
//!
//! ## Optional
//! - `CONSOLE_HOST` - Bind address (default: 127.0.0.1)
//! - `CONSOLE_PORT` - Listen port (default: 3100)
//! - `BACKEND_TIMEOUT_SECS` - Per-request backend timeout (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate, 0.0-1.0 (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Console application configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the console
    pub base_url: String,
    /// Managed backend configuration
    pub backend: BackendConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Managed relational backend configuration.
///
/// Implements `Debug` manually to redact the service key, which grants
/// full access to the company's stock and activity data.
#[derive(Clone)]
pub struct BackendConfig {
    /// Base URL of the backend's RPC surface
    pub base_url: Url,
    /// Service key sent as a bearer header
    pub service_key: SecretString,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url.as_str())
            .field("service_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the service key fails validation (placeholder detection, entropy
    /// check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("CONSOLE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CONSOLE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CONSOLE_PORT", "3100")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CONSOLE_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("CONSOLE_BASE_URL")?;

        let backend = BackendConfig::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_env_or_default("SENTRY_SAMPLE_RATE", "1.0")
            .parse::<f32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SENTRY_SAMPLE_RATE".to_string(), e.to_string())
            })?;
        let sentry_traces_sample_rate = get_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")
            .parse::<f32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SENTRY_TRACES_SAMPLE_RATE".to_string(), e.to_string())
            })?;

        Ok(Self {
            host,
            port,
            base_url,
            backend,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_required_env("BACKEND_URL")?;
        let base_url = Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("BACKEND_URL".to_string(), e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "BACKEND_URL".to_string(),
                "must be a base URL (http/https)".to_string(),
            ));
        }

        let service_key = get_validated_secret("BACKEND_SERVICE_KEY")?;

        let timeout_secs = get_env_or_default("BACKEND_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BACKEND_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            base_url,
            service_key,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real service keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated key."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_high() {
        // Random-looking string should have high entropy
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-service-key-here", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        // High-entropy random string
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_backend_config_debug_redacts_key() {
        let config = BackendConfig {
            base_url: Url::parse("https://backend.example.com").unwrap(),
            service_key: SecretString::from("aB3$xY9!mK2@nL5#"),
            timeout: Duration::from_secs(30),
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("aB3$xY9"));
    }

    #[test]
    fn test_socket_addr() {
        let config = ConsoleConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3100,
            base_url: "http://localhost:3100".to_string(),
            backend: BackendConfig {
                base_url: Url::parse("https://backend.example.com").unwrap(),
                service_key: SecretString::from("aB3$xY9!mK2@nL5#"),
                timeout: Duration::from_secs(30),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3100");
    }
}
