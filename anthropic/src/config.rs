//! Client configuration

use std::time::Duration;

/// Default API base URL
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1";

/// API version sent in the `anthropic-version` header
pub const DEFAULT_API_VERSION: &str = "2023-06-01";

/// Connection settings for [`AnthropicClient`](crate::AnthropicClient).
#[derive(Clone)]
pub struct AnthropicConfig {
    /// API key sent as `x-api-key`
    pub api_key: String,
    /// Base URL, without trailing slash
    pub api_url: String,
    /// Value of the `anthropic-version` header
    pub api_version: String,
    /// Whole-request timeout applied by the HTTP client
    pub timeout: Duration,
}

// The key stays out of logs
impl std::fmt::Debug for AnthropicConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AnthropicConfig {
    /// Create a configuration with default URL, version and a 30s timeout
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Builder: Set base URL
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder: Set request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnthropicConfig::new("test-key");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_api_url_trailing_slash_is_trimmed() {
        let config = AnthropicConfig::new("k").with_api_url("http://localhost:9999/v1/");
        assert_eq!(config.api_url, "http://localhost:9999/v1");
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", AnthropicConfig::new("sk-secret"));
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
