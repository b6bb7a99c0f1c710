//! Classifier behavior against scripted providers.

#![allow(clippy::unwrap_used)] // Tests can unwrap

use helpdesk_core::{
    Category, Classifier, ClassifierConfig, Priority, ProviderError, UnconfiguredProvider,
};
use helpdesk_testing::{
    ClassifierTest, FailingProvider, ScriptedProvider, StalledProvider, init_test_tracing,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_provider_labels_are_used() {
    ClassifierTest::new()
        .given_provider(ScriptedProvider::replying(
            r#"{"category":"technical","priority":"critical"}"#,
        ))
        .when_classifying("Production is down")
        .then_labels(Category::Technical, Priority::Critical)
        .then_no_warning()
        .run()
        .await;
}

#[tokio::test]
async fn test_prose_around_object_is_tolerated() {
    ClassifierTest::new()
        .given_provider(ScriptedProvider::replying(
            "Here is my classification:\n```json\n{\"category\": \"Billing\", \"priority\": \"High\"}\n```\nLet me know!",
        ))
        .when_classifying("Refund never arrived")
        .then_labels(Category::Billing, Priority::High)
        .then_no_warning()
        .run()
        .await;
}

#[tokio::test]
async fn test_missing_fields_default_without_warning() {
    ClassifierTest::new()
        .given_provider(ScriptedProvider::replying(r#"{"priority":"medium"}"#))
        .when_classifying("Something odd happened")
        .then_labels(Category::General, Priority::Medium)
        .then_no_warning()
        .run()
        .await;
}

#[tokio::test]
async fn test_malformed_reply_falls_back() {
    ClassifierTest::new()
        .given_provider(ScriptedProvider::replying("I think this is a billing issue."))
        .when_classifying("Payment failed twice")
        .then_labels(Category::Billing, Priority::Medium)
        .then_fallback_warning()
        .run()
        .await;
}

#[tokio::test]
async fn test_unknown_label_falls_back() {
    ClassifierTest::new()
        .given_provider(ScriptedProvider::replying(
            r#"{"category":"technical","priority":"urgent"}"#,
        ))
        .when_classifying("The app shows an error")
        .then_labels(Category::Technical, Priority::High)
        .then_fallback_warning()
        .run()
        .await;
}

#[tokio::test]
async fn test_every_provider_failure_falls_back() {
    let failures = [
        ProviderError::MissingCredential,
        ProviderError::Transport("connection reset".to_string()),
        ProviderError::RateLimited,
        ProviderError::Unauthorized,
        ProviderError::Status {
            status: 500,
            message: "overloaded".to_string(),
        },
        ProviderError::EmptyResponse,
    ];

    for failure in failures {
        ClassifierTest::new()
            .given_provider(FailingProvider::new(failure))
            .when_classifying("I can't login to my account")
            .then_labels(Category::Account, Priority::Medium)
            .then_fallback_warning()
            .run()
            .await;
    }
}

#[tokio::test]
async fn test_no_keyword_match_is_general_low() {
    ClassifierTest::new()
        .when_classifying("Please add dark mode")
        .then_labels(Category::General, Priority::Low)
        .then_fallback_warning()
        .run()
        .await;
}

#[tokio::test]
async fn test_blank_description_is_rejected_without_provider_call() {
    let provider = ScriptedProvider::replying(r#"{"category":"billing"}"#);

    for description in ["", "   ", "\n\t"] {
        ClassifierTest::new()
            .given_provider(provider.clone())
            .when_classifying(description)
            .then_invalid_input()
            .run()
            .await;
    }

    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_request_carries_configured_model_and_prompt() {
    let provider = ScriptedProvider::replying(r#"{"category":"account","priority":"low"}"#);
    let config = ClassifierConfig::default()
        .with_model("test-model")
        .with_max_tokens(64);
    let classifier = Classifier::new(Arc::new(provider.clone()), config);

    classifier.classify("Reset my password").await.unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "test-model");
    assert_eq!(requests[0].max_tokens, 64);
    assert!(requests[0].prompt.contains("Reset my password"));
}

#[tokio::test]
async fn test_stalled_provider_times_out_and_is_abandoned() {
    init_test_tracing();
    let provider = StalledProvider::new();
    let config = ClassifierConfig::default().with_timeout(Duration::from_millis(50));
    let classifier = Classifier::new(Arc::new(provider.clone()), config);

    let started = std::time::Instant::now();
    let result = classifier.classify("There's a bug in search").await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(result.suggested_category, Category::Technical);
    assert_eq!(result.suggested_priority, Priority::High);
    assert!(result.is_fallback());
    assert_eq!(provider.started(), 1);
    assert_eq!(provider.abandoned(), 1);
}

#[tokio::test]
async fn test_dropping_classify_abandons_provider_call() {
    let provider = StalledProvider::new();
    let classifier = Classifier::new(Arc::new(provider.clone()), ClassifierConfig::default());

    // Caller gives up well before the classifier's own timeout
    let outcome =
        tokio::time::timeout(Duration::from_millis(20), classifier.classify("anything")).await;

    assert!(outcome.is_err());
    assert_eq!(provider.started(), 1);
    assert_eq!(provider.abandoned(), 1);
}

#[tokio::test]
async fn test_classification_is_deterministic_on_fallback() {
    let classifier = Classifier::new(Arc::new(UnconfiguredProvider), ClassifierConfig::default());

    let first = classifier.classify("Charge appeared twice").await.unwrap();
    let second = classifier.classify("Charge appeared twice").await.unwrap();

    assert_eq!(first, second);
}
