//! Configuration management for the helpdesk server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Only the server binary reads the environment; everything below it receives
//! explicit config structs.

use helpdesk_anthropic::AnthropicConfig;
use helpdesk_core::ClassifierConfig;
use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,helpdesk=debug,sqlx=warn";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Ticket storage configuration
    pub database: DatabaseConfig,
    /// Classifier and inference provider configuration
    pub classifier: ClassifierSettings,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// `tracing` filter directives (`RUST_LOG`)
    pub log_level: String,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
    /// Origins allowed by CORS (empty = any origin)
    pub cors_allowed_origins: Vec<String>,
    /// Whether to install the Prometheus recorder and serve `/metrics`
    pub metrics_enabled: bool,
}

/// Ticket storage configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL; `None` selects the in-memory store
    pub url: Option<String>,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout: u64,
    /// Run embedded migrations at startup
    pub run_migrations: bool,
}

/// Classifier configuration
#[derive(Clone)]
pub struct ClassifierSettings {
    /// Anthropic API key; `None` means every classification uses keyword rules
    pub api_key: Option<String>,
    /// Override for the Anthropic API base URL
    pub api_url: Option<String>,
    /// Model identifier
    pub model: String,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Provider call timeout in milliseconds
    pub timeout_ms: u64,
}

impl fmt::Debug for ClassifierSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparseable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = ClassifierConfig::default();
        let text = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Self {
            server: ServerConfig {
                host: text("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parsed(&lookup, "PORT").unwrap_or(8000),
                log_level: text("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
                shutdown_timeout: parsed(&lookup, "SHUTDOWN_TIMEOUT").unwrap_or(30),
                cors_allowed_origins: text("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|origin| !origin.is_empty())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
                metrics_enabled: flag(&lookup, "METRICS_ENABLED").unwrap_or(true),
            },
            database: DatabaseConfig {
                url: text("DATABASE_URL"),
                max_connections: parsed(&lookup, "DATABASE_MAX_CONNECTIONS").unwrap_or(10),
                connect_timeout: parsed(&lookup, "DATABASE_CONNECT_TIMEOUT").unwrap_or(30),
                run_migrations: flag(&lookup, "DATABASE_RUN_MIGRATIONS").unwrap_or(true),
            },
            classifier: ClassifierSettings {
                api_key: text("ANTHROPIC_API_KEY"),
                api_url: text("ANTHROPIC_API_URL"),
                model: text("CLASSIFIER_MODEL").unwrap_or(defaults.model),
                max_tokens: parsed(&lookup, "CLASSIFIER_MAX_TOKENS").unwrap_or(defaults.max_tokens),
                timeout_ms: parsed(&lookup, "CLASSIFIER_TIMEOUT_MS")
                    .unwrap_or_else(|| u64::try_from(defaults.timeout.as_millis()).unwrap_or(u64::MAX)),
            },
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|s| s.trim().parse().ok())
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    lookup(key).and_then(|s| match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    })
}

impl ServerConfig {
    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns an error if `host:port` is not a valid socket address.
    pub fn bind_address(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Graceful shutdown bound
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}

impl DatabaseConfig {
    /// Pool acquire timeout
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}

impl ClassifierSettings {
    /// Provider call timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Classifier configuration for these settings.
    #[must_use]
    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig::default()
            .with_model(self.model.clone())
            .with_max_tokens(self.max_tokens)
            .with_timeout(self.timeout())
    }

    /// Anthropic client configuration, if a key is configured.
    ///
    /// The HTTP client timeout matches the classifier timeout so an abandoned
    /// request does not outlive the call that issued it.
    #[must_use]
    pub fn anthropic_config(&self) -> Option<AnthropicConfig> {
        let api_key = self.api_key.as_ref()?;
        let config = AnthropicConfig::new(api_key.clone()).with_timeout(self.timeout());

        Some(match &self.api_url {
            Some(url) => config.with_api_url(url.clone()),
            None => config,
        })
    }
}
