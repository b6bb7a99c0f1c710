//! Anthropic API client implementation

use crate::{
    config::AnthropicConfig,
    error::ClaudeError,
    messages::{ErrorEnvelope, MessagesRequest, MessagesResponse},
};
use reqwest::{Client, StatusCode};

/// Anthropic API client
#[derive(Clone, Debug)]
pub struct AnthropicClient {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicClient {
    /// Create a new client with explicit configuration
    ///
    /// # Errors
    ///
    /// Returns `ClaudeError::ClientBuild` if the HTTP client cannot be built
    pub fn new(config: AnthropicConfig) -> Result<Self, ClaudeError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClaudeError::ClientBuild(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &AnthropicConfig {
        &self.config
    }

    /// Create messages (non-streaming)
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, timeouts, API errors, or parsing failures
    pub async fn messages(&self, request: MessagesRequest) -> Result<MessagesResponse, ClaudeError> {
        let response = self
            .client
            .post(format!("{}/messages", self.config.api_url))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", &self.config.api_version)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| self.request_error(&e))?;

        match response.status() {
            StatusCode::OK => {
                let body = response
                    .json::<MessagesResponse>()
                    .await
                    .map_err(|e| ClaudeError::ResponseParseFailed(e.to_string()))?;
                tracing::debug!(
                    message_id = %body.id,
                    input_tokens = body.usage.input_tokens,
                    output_tokens = body.usage.output_tokens,
                    "Messages API call completed"
                );
                Ok(body)
            }
            StatusCode::TOO_MANY_REQUESTS => Err(ClaudeError::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClaudeError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ClaudeError::ApiError {
                    status: status.as_u16(),
                    message: error_message(&body),
                })
            }
        }
    }

    fn request_error(&self, error: &reqwest::Error) -> ClaudeError {
        if error.is_timeout() {
            ClaudeError::Timeout(self.config.timeout)
        } else {
            ClaudeError::RequestFailed(error.to_string())
        }
    }
}

/// Prefers the structured API message over the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body).map_or_else(
        |_| body.to_string(),
        |envelope| format!("{}: {}", envelope.error.kind, envelope.error.message),
    )
}
