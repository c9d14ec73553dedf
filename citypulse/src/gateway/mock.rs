//! Scripted gateway for tests and offline demos.
//!
//! Replies are queued per kind and consumed in order. When a queue runs dry the mock answers
//! with an empty local-info structure (structured calls) or an empty string (text calls), so a
//! retry loop always terminates.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::wire::{CitationRef, UserLocation};
use super::{PlaceSummary, SearchGateway, StructuredResponse};
use crate::error::GatewayError;

/// Mock search gateway: queued structured and text replies, call counters, recorded prompts.
///
/// **Interaction**: Implements `SearchGateway`; used by `Retriever` in tests and by the server
/// e2e suite.
#[derive(Default)]
pub struct MockGateway {
    structured: Mutex<VecDeque<Result<StructuredResponse, GatewayError>>>,
    text: Mutex<VecDeque<Result<String, GatewayError>>>,
    structured_calls: AtomicUsize,
    text_calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    /// Sleep before every reply (exercises per-attempt timeouts).
    delay: Option<Duration>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn empty_content() -> Value {
    json!({"events": [], "restaurants": [], "alerts": []})
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a structured reply without citations.
    pub fn with_structured(self, content: Value) -> Self {
        self.with_structured_and_citations(content, Vec::new())
    }

    /// Queue a structured reply with top-level sources.
    pub fn with_structured_and_citations(self, content: Value, citations: Vec<CitationRef>) -> Self {
        lock(&self.structured).push_back(Ok(StructuredResponse { content, citations }));
        self
    }

    /// Queue a failing structured call.
    pub fn with_structured_error(self, error: GatewayError) -> Self {
        lock(&self.structured).push_back(Err(error));
        self
    }

    /// Queue a text reply (basic, location-based and insights modes share one queue).
    pub fn with_text(self, text: impl Into<String>) -> Self {
        lock(&self.text).push_back(Ok(text.into()));
        self
    }

    pub fn with_text_error(self, error: GatewayError) -> Self {
        lock(&self.text).push_back(Err(error));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of structured calls received so far.
    pub fn structured_calls(&self) -> usize {
        self.structured_calls.load(Ordering::SeqCst)
    }

    /// Number of text calls received so far.
    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    /// Every prompt received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    async fn pause(&self) {
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
    }

    async fn next_text(&self, prompt: String) -> Result<String, GatewayError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.prompts).push(prompt);
        self.pause().await;
        lock(&self.text).pop_front().unwrap_or_else(|| Ok(String::new()))
    }
}

#[async_trait]
impl SearchGateway for MockGateway {
    async fn basic_query(&self, prompt: &str) -> Result<String, GatewayError> {
        self.next_text(prompt.to_string()).await
    }

    async fn geo_structured_output_with_citations(
        &self,
        prompt: &str,
        _schema: &Value,
    ) -> Result<StructuredResponse, GatewayError> {
        self.structured_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.prompts).push(prompt.to_string());
        self.pause().await;
        lock(&self.structured).pop_front().unwrap_or_else(|| {
            Ok(StructuredResponse {
                content: empty_content(),
                citations: Vec::new(),
            })
        })
    }

    async fn location_based_search(
        &self,
        prompt: &str,
        _location: &UserLocation,
    ) -> Result<String, GatewayError> {
        self.next_text(prompt.to_string()).await
    }

    async fn location_insights(&self, place: &PlaceSummary) -> Result<String, GatewayError> {
        self.next_text(place.name.clone()).await
    }
}
