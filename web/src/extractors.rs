//! Custom Axum extractors.

use crate::middleware::correlation_id_from_headers;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::fmt;
use uuid::Uuid;

/// Correlation ID for request tracing.
///
/// Taken from the request extensions when [`correlation_id_layer`] is
/// installed, so handlers see the same value the middleware logged. Without
/// the layer it falls back to the `X-Correlation-ID` header, then to a fresh
/// UUID.
///
/// [`correlation_id_layer`]: crate::middleware::correlation_id_layer
///
/// # Example
///
/// ```
/// use helpdesk_web::CorrelationId;
///
/// async fn handler(correlation_id: CorrelationId) -> String {
///     format!("Request ID: {correlation_id}")
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    /// A new random correlation ID
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The ID as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Self>() {
            return Ok(id.clone());
        }

        Ok(correlation_id_from_headers(&parts.headers).unwrap_or_else(Self::generate))
    }
}
