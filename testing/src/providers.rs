//! Inference providers with scripted behavior.
//!
//! - [`ScriptedProvider`]: replays queued replies and records every request
//! - [`FailingProvider`]: always fails with one error
//! - [`StalledProvider`]: never answers, and counts abandoned calls

use async_trait::async_trait;
use helpdesk_core::provider::{CompletionRequest, InferenceProvider, ProviderError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

type Reply = Result<String, ProviderError>;

/// Provider that answers from a queue of replies.
///
/// Replies are consumed in order; the last one repeats once the queue is
/// down to it.
#[derive(Debug, Clone)]
pub struct ScriptedProvider {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    /// Create a provider from a sequence of replies
    ///
    /// An empty sequence behaves like a provider returning no text.
    #[must_use]
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Provider that always replies with `text`
    #[must_use]
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new([Ok(text.into())])
    }

    /// Number of calls made so far
    #[must_use]
    pub fn calls(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Every request received, in order
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn next_reply(&self) -> Reply {
        let mut replies = self.replies.lock().unwrap_or_else(PoisonError::into_inner);
        if replies.len() > 1 {
            replies.pop_front().unwrap_or(Err(ProviderError::EmptyResponse))
        } else {
            replies
                .front()
                .cloned()
                .unwrap_or(Err(ProviderError::EmptyResponse))
        }
    }
}

#[async_trait]
impl InferenceProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        self.next_reply()
    }
}

/// Provider that always fails with the same error.
#[derive(Debug, Clone)]
pub struct FailingProvider {
    error: ProviderError,
    calls: Arc<AtomicUsize>,
}

impl FailingProvider {
    /// Create a provider failing with `error`
    #[must_use]
    pub fn new(error: ProviderError) -> Self {
        Self {
            error,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of calls made so far
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceProvider for FailingProvider {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}

/// Provider whose calls never complete.
///
/// Each call counts as started when polled and as abandoned when its future
/// is dropped, which is how a caller's timeout shows up.
#[derive(Debug, Clone, Default)]
pub struct StalledProvider {
    started: Arc<AtomicUsize>,
    abandoned: Arc<AtomicUsize>,
}

impl StalledProvider {
    /// Create a stalled provider
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls that reached the provider
    #[must_use]
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Calls whose futures were dropped before completing
    #[must_use]
    pub fn abandoned(&self) -> usize {
        self.abandoned.load(Ordering::SeqCst)
    }
}

struct AbandonGuard(Arc<AtomicUsize>);

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl InferenceProvider for StalledProvider {
    fn name(&self) -> &'static str {
        "stalled"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<String, ProviderError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let _guard = AbandonGuard(Arc::clone(&self.abandoned));
        std::future::pending::<()>().await;
        Err(ProviderError::EmptyResponse)
    }
}
