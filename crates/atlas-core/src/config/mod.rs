//! Application configuration with layered loading.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//!
//! 1. **Compiled defaults**: Hardcoded in struct `Default` implementations
//! 2. **Config file**: TOML file specified by `ATLAS_CONFIG` env var
//! 3. **Environment variables**: `ATLAS__*` env vars override specific fields
//!
//! # Configuration Sections
//!
//! - [`ServerConfig`]: HTTP server settings (bind address, concurrency)
//! - [`MembershipConfig`]: upstream pRPC endpoints in priority order plus
//!   the retry/backoff/timeout policy
//! - [`CacheControlConfig`]: response cache header policy
//! - [`LoggingConfig`]: log level and format
//!
//! # Validation
//!
//! Configuration is validated at startup. Invalid configurations (no
//! endpoints, malformed URLs, zero retry budget) return errors rather than
//! failing silently mid-request.
//!
//! # Example
//!
//! ```toml
//! [server]
//! bind_address = "0.0.0.0"
//! bind_port = 3040
//!
//! [[membership.endpoints]]
//! name = "devnet-primary"
//! url = "https://api.devnet.xandeum.com:8899"
//! ```

use crate::{types::RpcEndpoint, upstream::RetryPolicy};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// HTTP server configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// IP address to bind the server to. Defaults to `127.0.0.1`.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port number to listen on. Must be greater than 0. Defaults to `3040`.
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Maximum number of concurrent requests the server accepts. Defaults
    /// to `100`.
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    3040
}

fn default_max_concurrent_requests() -> usize {
    100
}

/// Upstream membership retrieval configuration.
///
/// Endpoints are tried strictly in the order listed; the retry/backoff
/// policy applies per endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipConfig {
    /// Upstream pRPC endpoints in priority order. Cannot be empty.
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<RpcEndpoint>,

    /// Attempts per endpoint before falling back to the next one. Must be
    /// at least 1. Defaults to `3`.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff delay in milliseconds; doubles after each failed
    /// attempt. Defaults to `1000`.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Backoff ceiling in milliseconds. Defaults to `10000`.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Per-attempt request timeout in seconds; the in-flight request is
    /// aborted when it expires. Defaults to `30`.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

fn default_endpoints() -> Vec<RpcEndpoint> {
    vec![
        RpcEndpoint {
            name: "devnet-primary".to_string(),
            url: "https://api.devnet.xandeum.com:8899".to_string(),
        },
        RpcEndpoint {
            name: "devnet-backup".to_string(),
            url: "https://rpc.xandeum.network".to_string(),
        },
    ]
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_request_timeout_seconds() -> u64 {
    30
}

/// Response cache header policy.
///
/// Successful data responses advertise a short public TTL with
/// stale-while-revalidate, consistent with the ~10s staleness tolerance of
/// the whole pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheControlConfig {
    /// `s-maxage` in seconds. Must be greater than 0. Defaults to `10`.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,

    /// `stale-while-revalidate` window in seconds. Defaults to `30`.
    #[serde(default = "default_swr_seconds")]
    pub stale_while_revalidate_seconds: u64,
}

fn default_ttl_seconds() -> u64 {
    10
}

fn default_swr_seconds() -> u64 {
    30
}

/// Application logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g. "trace", "debug", "info", "warn", "error").
    /// Defaults to `"info"`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: `"json"` or `"pretty"`. Defaults to `"pretty"`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

/// Root application configuration containing all subsystem settings.
///
/// Loaded from a TOML file with `ATLAS__*` environment overrides using `__`
/// as the section separator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment (e.g. "development", "production").
    /// Defaults to `"development"`.
    #[serde(default = "default_environment")]
    pub environment: String,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream membership retrieval configuration.
    #[serde(default)]
    pub membership: MembershipConfig,

    /// Response cache header policy.
    #[serde(default)]
    pub cache_control: CacheControlConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_environment() -> String {
    "development".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            max_concurrent_requests: default_max_concurrent_requests(),
        }
    }
}

impl Default for MembershipConfig {
    fn default() -> Self {
        Self {
            endpoints: default_endpoints(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

impl Default for CacheControlConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            stale_while_revalidate_seconds: default_swr_seconds(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), format: default_log_format() }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            server: ServerConfig::default(),
            membership: MembershipConfig::default(),
            cache_control: CacheControlConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file with environment variable
    /// overrides.
    ///
    /// Environment variables with the `ATLAS__` prefix can override any
    /// configuration value, using `__` as a separator for nested fields
    /// (e.g. `ATLAS__SERVER__BIND_PORT=8080`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or
    /// deserialized.
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_builder = Config::builder()
            .set_default("environment", "development")?
            .set_default("server.bind_address", "127.0.0.1")?
            .set_default("server.bind_port", 3040)?
            .set_default("server.max_concurrent_requests", 100)?
            .set_default("membership.max_retries", 3)?
            .set_default("membership.base_delay_ms", 1000)?
            .set_default("membership.max_delay_ms", 10_000)?
            .set_default("membership.request_timeout_seconds", 30)?
            .set_default("cache_control.ttl_seconds", 10)?
            .set_default("cache_control.stale_while_revalidate_seconds", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name(&config_path.as_ref().to_string_lossy()).required(false))
            .add_source(Environment::with_prefix("ATLAS").separator("__"))
            .build()?;

        config_builder.try_deserialize()
    }

    /// Loads configuration from `config/config.toml` with fallback to
    /// defaults.
    ///
    /// The config file path can be overridden using the `ATLAS_CONFIG`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration cannot be loaded or
    /// parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("ATLAS_CONFIG").unwrap_or_else(|_| "config/config.toml".to_string());
        Self::from_file(&config_path)
    }

    /// Returns the parsed socket address for the HTTP server.
    ///
    /// # Errors
    ///
    /// Returns an error string if the address cannot be parsed into a valid
    /// [`SocketAddr`](std::net::SocketAddr).
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, String> {
        format!("{}:{}", self.server.bind_address, self.server.bind_port)
            .parse()
            .map_err(|_| {
                format!(
                    "Invalid socket address: {}:{}",
                    self.server.bind_address, self.server.bind_port
                )
            })
    }

    /// Returns the membership retry/backoff policy as a [`RetryPolicy`].
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.membership.max_retries,
            base_delay: Duration::from_millis(self.membership.base_delay_ms),
            max_delay: Duration::from_millis(self.membership.max_delay_ms),
        }
    }

    /// Returns the per-attempt upstream request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.membership.request_timeout_seconds)
    }

    /// Validates the configuration for correctness and consistency.
    ///
    /// Checks include:
    /// - At least one membership endpoint is configured
    /// - All endpoint URLs are properly formatted
    /// - The retry budget and numeric values are greater than zero where
    ///   required
    /// - Logging format is either `"json"` or `"pretty"`
    ///
    /// # Errors
    ///
    /// Returns a descriptive error string if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.membership.endpoints.is_empty() {
            return Err("No membership endpoints configured".to_string());
        }

        for endpoint in &self.membership.endpoints {
            if endpoint.name.is_empty() {
                return Err(format!("Empty name for endpoint: {}", endpoint.url));
            }
            if !endpoint.url.starts_with("http") {
                return Err(format!(
                    "Invalid URL for endpoint {}: {}",
                    endpoint.name, endpoint.url
                ));
            }
        }

        if self.membership.max_retries == 0 {
            return Err("Retry budget must be at least 1 attempt".to_string());
        }

        if self.membership.request_timeout_seconds == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }

        if self.cache_control.ttl_seconds == 0 {
            return Err("Cache TTL must be greater than 0".to_string());
        }

        if self.server.max_concurrent_requests == 0 {
            return Err("Max concurrent requests must be greater than 0".to_string());
        }

        if self.server.bind_port == 0 {
            return Err("Bind port must be greater than 0".to_string());
        }

        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err("Logging format must be 'json' or 'pretty'".to_string());
        }

        Ok(())
    }
}
