//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_STOREFRONT_PRIVATE_TOKEN` - Storefront API private access token
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SHOPIFY_API_VERSION` - API version (default: 2026-01)
//! - `SHOPIFY_STOREFRONT_ENDPOINT` - Override the Storefront GraphQL URL
//! - `SHOPIFY_ADMIN_TOKEN` - Admin API access token (enables wholesale orders)
//! - `SHOPIFY_ADMIN_ENDPOINT` - Override the Admin GraphQL URL
//! - `SHOPIFY_REQUEST_TIMEOUT_SECS` - Outbound request timeout (default: 10)
//! - `CAROUSEL_STEP_PX` - Pixels per carousel tick (default: 1.0)
//! - `CAROUSEL_TICK_MS` - Carousel tick interval (default: 20)
//! - `CAROUSEL_DRAG_MULTIPLIER` - Drag travel scale (default: 2.0)
//! - `GA4_MEASUREMENT_ID` - Google Analytics 4 measurement ID
//! - `META_PIXEL_ID` - Meta (Facebook) pixel ID
//! - `CONTACT_EMAIL` - Address shown in the contact slide-over
//! - `CONTACT_PHONE` - Phone number shown in the contact slide-over
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag (default: production)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use orchard_core::carousel::CarouselConfig;
use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_API_VERSION: &str = "2026-01";

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

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Shopify API configuration
    pub shopify: ShopifyConfig,
    /// Carousel tunables rendered into every carousel
    pub carousel: CarouselConfig,
    /// Analytics tracking configuration
    pub analytics: AnalyticsConfig,
    /// Contact details for the contact slide-over
    pub contact: ContactConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: String,
}

/// Shopify Storefront and Admin API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2026-01)
    pub api_version: String,
    /// Storefront API private access token (server-side only)
    pub storefront_private_token: SecretString,
    /// Storefront GraphQL URL override
    pub storefront_endpoint: Option<String>,
    /// Admin API access token; wholesale orders are disabled without it
    pub admin_token: Option<SecretString>,
    /// Admin GraphQL URL override
    pub admin_endpoint: Option<String>,
    /// Timeout applied to every outbound GraphQL request
    pub request_timeout: Duration,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("storefront_private_token", &"[REDACTED]")
            .field("storefront_endpoint", &self.storefront_endpoint)
            .field(
                "admin_token",
                &self.admin_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("admin_endpoint", &self.admin_endpoint)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ShopifyConfig {
    /// Storefront GraphQL endpoint URL.
    #[must_use]
    pub fn storefront_url(&self) -> String {
        self.storefront_endpoint.clone().unwrap_or_else(|| {
            format!(
                "https://{}/api/{}/graphql.json",
                self.store, self.api_version
            )
        })
    }

    /// Admin GraphQL endpoint URL.
    #[must_use]
    pub fn admin_url(&self) -> String {
        self.admin_endpoint.clone().unwrap_or_else(|| {
            format!(
                "https://{}/admin/api/{}/graphql.json",
                self.store, self.api_version
            )
        })
    }
}

/// Analytics and tracking pixel configuration.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsConfig {
    /// Google Analytics 4 measurement ID
    pub ga4_measurement_id: Option<String>,
    /// Meta (Facebook) pixel ID
    pub meta_pixel_id: Option<String>,
}

/// Contact details shown in the contact slide-over.
#[derive(Debug, Clone, Default)]
pub struct ContactConfig {
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default("STOREFRONT_HOST", "127.0.0.1".parse().ok())?;
        let port = parse_env_or_default("STOREFRONT_PORT", Some(3000))?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;

        let shopify = ShopifyConfig::from_env()?;
        let carousel = carousel_from_env()?;
        let analytics = AnalyticsConfig::from_env();
        let contact = ContactConfig {
            email: get_optional_env("CONTACT_EMAIL"),
            phone: get_optional_env("CONTACT_PHONE"),
        };
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_env_or_default("SENTRY_ENVIRONMENT", "production");

        Ok(Self {
            host,
            port,
            base_url,
            shopify,
            carousel,
            analytics,
            contact,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyConfig {
    /// Load the Shopify section on its own.
    ///
    /// The CLI only needs Shopify credentials, not the web server settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the store or Storefront token is missing, or
    /// a token fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let timeout_secs: u64 = parse_env_or_default("SHOPIFY_REQUEST_TIMEOUT_SECS", Some(10))?;
        let admin_token = match get_optional_env("SHOPIFY_ADMIN_TOKEN") {
            Some(token) => {
                validate_secret_strength(&token, "SHOPIFY_ADMIN_TOKEN")?;
                Some(SecretString::from(token))
            }
            None => None,
        };

        Ok(Self {
            store: get_required_env("SHOPIFY_STORE")?,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            storefront_private_token: get_validated_secret("SHOPIFY_STOREFRONT_PRIVATE_TOKEN")?,
            storefront_endpoint: get_optional_env("SHOPIFY_STOREFRONT_ENDPOINT"),
            admin_token,
            admin_endpoint: get_optional_env("SHOPIFY_ADMIN_ENDPOINT"),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl AnalyticsConfig {
    fn from_env() -> Self {
        Self {
            ga4_measurement_id: get_optional_env("GA4_MEASUREMENT_ID"),
            meta_pixel_id: get_optional_env("META_PIXEL_ID"),
        }
    }
}

fn carousel_from_env() -> Result<CarouselConfig, ConfigError> {
    let defaults = CarouselConfig::default();
    let config = CarouselConfig {
        step_px: parse_env_or_default("CAROUSEL_STEP_PX", Some(defaults.step_px))?,
        tick_ms: parse_env_or_default("CAROUSEL_TICK_MS", Some(defaults.tick_ms))?,
        drag_multiplier: parse_env_or_default(
            "CAROUSEL_DRAG_MULTIPLIER",
            Some(defaults.drag_multiplier),
        )?,
    };

    if !(config.step_px.is_finite() && config.step_px > 0.0) {
        return Err(ConfigError::InvalidEnvVar(
            "CAROUSEL_STEP_PX".to_string(),
            "must be a positive number".to_string(),
        ));
    }
    if config.tick_ms == 0 {
        return Err(ConfigError::InvalidEnvVar(
            "CAROUSEL_TICK_MS".to_string(),
            "must be at least 1".to_string(),
        ));
    }
    if !config.drag_multiplier.is_finite() {
        return Err(ConfigError::InvalidEnvVar(
            "CAROUSEL_DRAG_MULTIPLIER".to_string(),
            "must be a finite number".to_string(),
        ));
    }
    Ok(config)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, using `default` when it is unset.
fn parse_env_or_default<T>(key: &str, default: Option<T>) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get_optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => default.ok_or_else(|| ConfigError::MissingEnvVar(key.to_string())),
    }
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

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real access tokens are random hex or base62
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token Shopify generated."
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

    fn shopify_config() -> ShopifyConfig {
        ShopifyConfig {
            store: "orchard-test.myshopify.com".to_string(),
            api_version: "2026-01".to_string(),
            storefront_private_token: SecretString::from("shpat_private_value"),
            storefront_endpoint: None,
            admin_token: Some(SecretString::from("shpat_admin_value")),
            admin_endpoint: None,
            request_timeout: Duration::from_secs(10),
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("3f9a1c7be2d84056a9bc1e7f20d6384b", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_endpoint_urls_from_store() {
        let config = shopify_config();
        assert_eq!(
            config.storefront_url(),
            "https://orchard-test.myshopify.com/api/2026-01/graphql.json"
        );
        assert_eq!(
            config.admin_url(),
            "https://orchard-test.myshopify.com/admin/api/2026-01/graphql.json"
        );
    }

    #[test]
    fn test_endpoint_overrides() {
        let config = ShopifyConfig {
            storefront_endpoint: Some("http://127.0.0.1:9000/graphql".to_string()),
            admin_endpoint: Some("http://127.0.0.1:9000/admin".to_string()),
            ..shopify_config()
        };
        assert_eq!(config.storefront_url(), "http://127.0.0.1:9000/graphql");
        assert_eq!(config.admin_url(), "http://127.0.0.1:9000/admin");
    }

    #[test]
    fn test_shopify_config_debug_redacts_secrets() {
        let debug_output = format!("{:?}", shopify_config());

        assert!(debug_output.contains("orchard-test.myshopify.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("shpat_private_value"));
        assert!(!debug_output.contains("shpat_admin_value"));
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            shopify: shopify_config(),
            carousel: CarouselConfig::default(),
            analytics: AnalyticsConfig::default(),
            contact: ContactConfig::default(),
            sentry_dsn: None,
            sentry_environment: "test".to_string(),
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
