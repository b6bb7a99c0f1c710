//! Inference provider seam used by the classifier.
//!
//! The classifier only needs "send a prompt, get text back". Concrete clients
//! (the Anthropic client in production, scripted providers in tests) implement
//! [`InferenceProvider`] and report every failure as a [`ProviderError`] value.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// A single completion request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,
    /// Rendered prompt
    pub prompt: String,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

/// Failures of an inference call.
///
/// The classifier absorbs all of them into its fallback path; the variants
/// exist for logging and metrics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// No credential configured
    #[error("no API credential configured")]
    MissingCredential,

    /// The call did not finish within the bound
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),

    /// Network or protocol failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Provider is throttling or quota is exhausted
    #[error("rate limited or quota exceeded")]
    RateLimited,

    /// Credential was rejected
    #[error("credential rejected")]
    Unauthorized,

    /// Any other non-success response
    #[error("provider returned status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// Successful response without usable text
    #[error("provider returned no text")]
    EmptyResponse,
}

impl ProviderError {
    /// Stable label for metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::Timeout(_) => "timeout",
            Self::Transport(_) => "transport",
            Self::RateLimited => "rate_limited",
            Self::Unauthorized => "unauthorized",
            Self::Status { .. } => "status",
            Self::EmptyResponse => "empty_response",
        }
    }
}

/// Something that turns a prompt into text.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Provider name used in logs.
    fn name(&self) -> &'static str;

    /// Runs one completion and returns the raw text.
    ///
    /// Implementations should bound their own I/O, but callers must not rely
    /// on it: the classifier applies its own timeout and drops the future when
    /// it expires.
    ///
    /// # Errors
    ///
    /// Any failure to produce text, as a [`ProviderError`].
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;
}

/// Provider used when no credential is configured. Every call fails with
/// [`ProviderError::MissingCredential`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredProvider;

#[async_trait]
impl InferenceProvider for UnconfiguredProvider {
    fn name(&self) -> &'static str {
        "unconfigured"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<String, ProviderError> {
        Err(ProviderError::MissingCredential)
    }
}
