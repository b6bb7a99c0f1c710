//! Anthropic-backed [`InferenceProvider`].

use crate::config::ClassifierSettings;
use async_trait::async_trait;
use helpdesk_anthropic::{AnthropicClient, ClaudeError, Message, MessagesRequest};
use helpdesk_core::{CompletionRequest, InferenceProvider, ProviderError, UnconfiguredProvider};
use std::sync::Arc;

/// Sends classification prompts to the Anthropic Messages API.
#[derive(Clone, Debug)]
pub struct AnthropicProvider {
    client: AnthropicClient,
}

impl AnthropicProvider {
    /// Wrap a configured client.
    #[must_use]
    pub const fn new(client: AnthropicClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InferenceProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let request = MessagesRequest::new(vec![Message::user(request.prompt)])
            .with_model(request.model)
            .with_max_tokens(request.max_tokens);

        let response = self.client.messages(request).await.map_err(provider_error)?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Maps client failures onto the classifier's provider taxonomy.
fn provider_error(err: ClaudeError) -> ProviderError {
    match err {
        ClaudeError::Timeout(after) => ProviderError::Timeout(after),
        ClaudeError::ClientBuild(message)
        | ClaudeError::RequestFailed(message)
        | ClaudeError::ResponseParseFailed(message) => ProviderError::Transport(message),
        ClaudeError::RateLimited => ProviderError::RateLimited,
        ClaudeError::Unauthorized => ProviderError::Unauthorized,
        ClaudeError::ApiError { status, message } => ProviderError::Status { status, message },
    }
}

/// Builds the provider for the configured settings.
///
/// Without an API key, or if the HTTP client cannot be built, every
/// classification takes the keyword fallback.
#[must_use]
pub fn build_provider(settings: &ClassifierSettings) -> Arc<dyn InferenceProvider> {
    let Some(config) = settings.anthropic_config() else {
        tracing::warn!("ANTHROPIC_API_KEY not set; classification will use keyword rules");
        return Arc::new(UnconfiguredProvider);
    };

    match AnthropicClient::new(config) {
        Ok(client) => {
            tracing::info!(model = %settings.model, "Anthropic provider configured");
            Arc::new(AnthropicProvider::new(client))
        }
        Err(error) => {
            tracing::warn!(%error, "Failed to build Anthropic client; classification will use keyword rules");
            Arc::new(UnconfiguredProvider)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::config::Config;
    use std::time::Duration;

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            provider_error(ClaudeError::Timeout(Duration::from_secs(3))),
            ProviderError::Timeout(Duration::from_secs(3))
        );
        assert_eq!(
            provider_error(ClaudeError::RequestFailed("connection reset".to_string())),
            ProviderError::Transport("connection reset".to_string())
        );
        assert_eq!(provider_error(ClaudeError::RateLimited), ProviderError::RateLimited);
        assert_eq!(provider_error(ClaudeError::Unauthorized), ProviderError::Unauthorized);
        assert_eq!(
            provider_error(ClaudeError::ApiError {
                status: 529,
                message: "overloaded".to_string(),
            }),
            ProviderError::Status {
                status: 529,
                message: "overloaded".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_no_key_yields_unconfigured_provider() {
        let settings = Config::from_lookup(|_| None).classifier;
        let provider = build_provider(&settings);

        assert_eq!(provider.name(), "unconfigured");
        let result = provider
            .complete(CompletionRequest {
                model: settings.model.clone(),
                prompt: "hello".to_string(),
                max_tokens: 16,
            })
            .await;
        assert_eq!(result, Err(ProviderError::MissingCredential));
    }

    #[test]
    fn test_key_yields_anthropic_provider() {
        let settings = Config::from_lookup(|key| {
            (key == "ANTHROPIC_API_KEY").then(|| "sk-test".to_string())
        })
        .classifier;

        assert_eq!(build_provider(&settings).name(), "anthropic");
    }
}
