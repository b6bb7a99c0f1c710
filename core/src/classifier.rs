//! Ticket classification with a degrading fallback.
//!
//! [`Classifier::classify`] asks an [`InferenceProvider`] for a category and a
//! priority. Whatever goes wrong on that path (timeout, transport error,
//! non-success status, text that holds no usable JSON) is absorbed: the
//! classifier answers from a fixed keyword rule set instead and attaches a
//! warning. The only error a caller can see is [`ClassifyError::InvalidInput`].
//!
//! # Flow
//!
//! ```text
//! description ──► validate ──► prompt ──► provider (bounded by timeout)
//!                    │                          │
//!                    ▼                          ▼
//!              InvalidInput          extract first {...} ──► parse labels
//!                                               │                 │
//!                                         any failure             ok
//!                                               ▼                 ▼
//!                                      keyword fallback     result, no warning
//!                                      + warning
//! ```

use crate::provider::{CompletionRequest, InferenceProvider, ProviderError};
use crate::types::{Category, Priority};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Warning attached to results produced by the keyword rules.
pub const FALLBACK_WARNING: &str =
    "AI classification unavailable; suggestion produced by keyword rules";

/// Keyword rules, checked in order. The first rule with a matching keyword wins.
const KEYWORD_RULES: &[(&[&str], Category, Priority)] = &[
    (&["payment", "charge"], Category::Billing, Priority::Medium),
    (&["error", "bug"], Category::Technical, Priority::High),
    (&["login", "account"], Category::Account, Priority::Medium),
];

/// Classifier settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Model identifier passed to the provider
    pub model: String,
    /// Upper bound for one provider call
    pub timeout: Duration,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-5-20250929".to_string(),
            timeout: Duration::from_secs(10),
            max_tokens: 256,
        }
    }
}

impl ClassifierConfig {
    /// Builder: Set model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Builder: Set timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder: Set max tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Suggested labels for a description.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Suggested category
    pub suggested_category: Category,
    /// Suggested priority
    pub suggested_priority: Priority,
    /// Present only when the keyword fallback produced the labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl ClassificationResult {
    /// Result from the provider
    #[must_use]
    pub const fn primary(category: Category, priority: Priority) -> Self {
        Self {
            suggested_category: category,
            suggested_priority: priority,
            warning: None,
        }
    }

    /// Result from the keyword rules
    #[must_use]
    pub fn fallback(category: Category, priority: Priority) -> Self {
        Self {
            suggested_category: category,
            suggested_priority: priority,
            warning: Some(FALLBACK_WARNING.to_string()),
        }
    }

    /// Returns `true` if the keyword rules produced this result
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.warning.is_some()
    }
}

/// Caller-visible classification errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// The description was empty or whitespace
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Why the provider path did not produce labels. Never returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimaryPathError {
    /// Call failed, timed out or was refused
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(#[from] ProviderError),

    /// Call succeeded but the text held no usable label object
    #[error("malformed provider response: {0}")]
    MalformedProviderResponse(String),
}

impl PrimaryPathError {
    /// Stable label for metrics.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::ProviderUnavailable(error) => error.kind(),
            Self::MalformedProviderResponse(_) => "malformed_response",
        }
    }
}

/// Classifies ticket descriptions.
#[derive(Clone)]
pub struct Classifier {
    provider: Arc<dyn InferenceProvider>,
    config: ClassifierConfig,
}

impl Classifier {
    /// Create a classifier over the given provider
    #[must_use]
    pub fn new(provider: Arc<dyn InferenceProvider>, config: ClassifierConfig) -> Self {
        Self { provider, config }
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Suggests a category and priority for a description.
    ///
    /// Provider failures never surface here; they produce a keyword-based
    /// result with [`ClassificationResult::warning`] set.
    ///
    /// # Errors
    ///
    /// `ClassifyError::InvalidInput` if the description is empty or
    /// whitespace. No provider call is made in that case.
    #[tracing::instrument(
        skip(self, description),
        fields(provider = self.provider.name(), description_len = description.len())
    )]
    pub async fn classify(&self, description: &str) -> Result<ClassificationResult, ClassifyError> {
        if description.trim().is_empty() {
            return Err(ClassifyError::InvalidInput(
                "description must not be empty".to_string(),
            ));
        }

        match self.classify_with_provider(description).await {
            Ok((category, priority)) => {
                metrics::counter!("helpdesk_classifications_total", "path" => "primary", "reason" => "none")
                    .increment(1);
                tracing::debug!(%category, %priority, "Provider classification succeeded");
                Ok(ClassificationResult::primary(category, priority))
            }
            Err(error) => {
                metrics::counter!("helpdesk_classifications_total", "path" => "fallback", "reason" => error.reason())
                    .increment(1);
                let (category, priority) = fallback_labels(description);
                tracing::warn!(
                    error = %error,
                    %category,
                    %priority,
                    "Provider classification failed, using keyword fallback"
                );
                Ok(ClassificationResult::fallback(category, priority))
            }
        }
    }

    async fn classify_with_provider(
        &self,
        description: &str,
    ) -> Result<(Category, Priority), PrimaryPathError> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            prompt: render_prompt(description),
            max_tokens: self.config.max_tokens,
        };

        let started = Instant::now();
        // Dropping the provider future on expiry abandons the in-flight call
        let outcome = tokio::time::timeout(self.config.timeout, self.provider.complete(request)).await;
        metrics::histogram!("helpdesk_provider_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        let text = match outcome {
            Ok(result) => result?,
            Err(_elapsed) => return Err(ProviderError::Timeout(self.config.timeout).into()),
        };

        parse_labels(&text)
    }
}

/// Builds the prompt sent to the provider.
#[must_use]
pub fn render_prompt(description: &str) -> String {
    let categories = join_labels(Category::ALL.iter().map(|c| c.as_str()));
    let priorities = join_labels(Priority::ALL.iter().map(|p| p.as_str()));

    format!(
        "You are a support ticket triage assistant.\n\
         Classify the support ticket below.\n\n\
         Respond with ONLY a JSON object with exactly two string fields:\n\
         {{\"category\": \"<category>\", \"priority\": \"<priority>\"}}\n\n\
         category must be one of: {categories}\n\
         priority must be one of: {priorities}\n\n\
         Ticket description:\n{description}"
    )
}

fn join_labels<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    labels.collect::<Vec<_>>().join(", ")
}

/// Returns the first balanced `{...}` substring of `text`.
///
/// Braces inside JSON string literals are ignored. Candidates are tried from
/// each `{` in order, so a stray unmatched brace in a preamble does not hide a
/// later object.
#[must_use]
pub fn extract_json_object(text: &str) -> Option<&str> {
    text.char_indices()
        .filter(|&(_, c)| c == '{')
        .find_map(|(start, _)| balanced_end(&text[start..]).map(|len| &text[start..start + len]))
}

/// Byte length of the balanced object at the start of `text`, if it closes.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (index, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(index + c.len_utf8());
                }
            }
            _ => {}
        }
    }

    None
}

#[derive(Deserialize)]
struct RawLabels {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    priority: Option<String>,
}

/// Parses provider text into labels.
///
/// Missing, null or blank `category` becomes `general`; missing, null or
/// blank `priority` becomes `low`.
///
/// # Errors
///
/// `PrimaryPathError::MalformedProviderResponse` if no object can be
/// extracted, it is not valid JSON, or a label is not a known value.
pub fn parse_labels(text: &str) -> Result<(Category, Priority), PrimaryPathError> {
    let object = extract_json_object(text).ok_or_else(|| {
        PrimaryPathError::MalformedProviderResponse("no JSON object in response".to_string())
    })?;

    let raw: RawLabels = serde_json::from_str(object)
        .map_err(|e| PrimaryPathError::MalformedProviderResponse(e.to_string()))?;

    let category = parse_or_default(raw.category.as_deref())?;
    let priority = parse_or_default(raw.priority.as_deref())?;
    Ok((category, priority))
}

fn parse_or_default<T>(value: Option<&str>) -> Result<T, PrimaryPathError>
where
    T: std::str::FromStr<Err = crate::types::ParseLabelError> + Default,
{
    match value.map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(text) => text
            .parse()
            .map_err(|e: crate::types::ParseLabelError| {
                PrimaryPathError::MalformedProviderResponse(e.to_string())
            }),
    }
}

/// Deterministic keyword classification used when the provider path fails.
#[must_use]
pub fn fallback_labels(description: &str) -> (Category, Priority) {
    let text = description.to_lowercase();

    KEYWORD_RULES
        .iter()
        .find(|(keywords, _, _)| keywords.iter().any(|k| text.contains(k)))
        .map_or((Category::General, Priority::Low), |&(_, category, priority)| {
            (category, priority)
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;

    #[test]
    fn test_extract_object_with_surrounding_text() {
        let text = r#"Sure! {"category":"technical","priority":"critical"} thanks"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"category":"technical","priority":"critical"}"#)
        );
    }

    #[test]
    fn test_extract_ignores_braces_in_strings() {
        let text = r#"Result: {"category":"billing","note":"use } or { freely"} done"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"category":"billing","note":"use } or { freely"}"#)
        );
    }

    #[test]
    fn test_extract_handles_escaped_quotes() {
        let text = r#"{"category":"say \"}\" twice","priority":"low"}"#;
        assert_eq!(extract_json_object(text), Some(text));
    }

    #[test]
    fn test_extract_skips_unclosed_preamble_brace() {
        let text = r#"Here { is my answer: {"category":"account"}"#;
        assert_eq!(extract_json_object(text), Some(r#"{"category":"account"}"#));
    }

    #[test]
    fn test_extract_returns_first_of_several() {
        let text = r#"{"category":"billing"} or {"category":"account"}"#;
        assert_eq!(extract_json_object(text), Some(r#"{"category":"billing"}"#));
    }

    #[test]
    fn test_extract_nested_object() {
        let text = r#"x {"a":{"b":1},"category":"general"} y"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"a":{"b":1},"category":"general"}"#)
        );
    }

    #[test]
    fn test_extract_none_without_object() {
        assert_eq!(extract_json_object("I cannot help with that."), None);
        assert_eq!(extract_json_object("{ never closed"), None);
        assert_eq!(extract_json_object(""), None);
    }

    #[test]
    fn test_parse_labels() {
        let labels = parse_labels(r#"{"category":"Technical","priority":" HIGH "}"#).unwrap();
        assert_eq!(labels, (Category::Technical, Priority::High));
    }

    #[test]
    fn test_parse_labels_defaults_missing_fields() {
        assert_eq!(
            parse_labels(r#"{"priority":"critical"}"#).unwrap(),
            (Category::General, Priority::Critical)
        );
        assert_eq!(
            parse_labels(r#"{"category":"billing"}"#).unwrap(),
            (Category::Billing, Priority::Low)
        );
        assert_eq!(
            parse_labels(r#"{"category":null,"priority":""}"#).unwrap(),
            (Category::General, Priority::Low)
        );
        assert_eq!(parse_labels("{}").unwrap(), (Category::General, Priority::Low));
    }

    #[test]
    fn test_parse_labels_rejects_malformed() {
        for text in [
            "not json at all",
            "{category: billing}",
            r#"{"category": 7}"#,
            r#"{"category":"shipping","priority":"low"}"#,
            r#"{"category":"billing","priority":"urgent"}"#,
        ] {
            let err = parse_labels(text).unwrap_err();
            assert!(
                matches!(err, PrimaryPathError::MalformedProviderResponse(_)),
                "expected malformed for {text:?}"
            );
            assert_eq!(err.reason(), "malformed_response");
        }
    }

    #[test]
    fn test_fallback_rules() {
        assert_eq!(
            fallback_labels("payment issue with my charge"),
            (Category::Billing, Priority::Medium)
        );
        assert_eq!(
            fallback_labels("I was CHARGED twice"),
            (Category::Billing, Priority::Medium)
        );
        assert_eq!(
            fallback_labels("Got an Error on save"),
            (Category::Technical, Priority::High)
        );
        assert_eq!(
            fallback_labels("found a bug"),
            (Category::Technical, Priority::High)
        );
        assert_eq!(
            fallback_labels("cannot LOGIN"),
            (Category::Account, Priority::Medium)
        );
        assert_eq!(
            fallback_labels("delete my account"),
            (Category::Account, Priority::Medium)
        );
        assert_eq!(
            fallback_labels("how do I export a report"),
            (Category::General, Priority::Low)
        );
    }

    #[test]
    fn test_fallback_rule_order() {
        // Billing is checked before technical and account
        assert_eq!(
            fallback_labels("payment error on my account"),
            (Category::Billing, Priority::Medium)
        );
        // Technical is checked before account
        assert_eq!(
            fallback_labels("login error"),
            (Category::Technical, Priority::High)
        );
    }

    #[test]
    fn test_prompt_lists_allowed_values() {
        let prompt = render_prompt("My invoice is wrong");
        assert!(prompt.contains("billing, technical, account, general"));
        assert!(prompt.contains("low, medium, high, critical"));
        assert!(prompt.contains(r#"{"category": "<category>", "priority": "<priority>"}"#));
        assert!(prompt.ends_with("My invoice is wrong"));
    }

    #[test]
    fn test_result_serialization_omits_absent_warning() {
        let json = serde_json::to_value(ClassificationResult::primary(
            Category::Account,
            Priority::High,
        ))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"suggested_category": "account", "suggested_priority": "high"})
        );

        let json = serde_json::to_value(ClassificationResult::fallback(
            Category::General,
            Priority::Low,
        ))
        .unwrap();
        assert_eq!(json["warning"], FALLBACK_WARNING);
    }
}
