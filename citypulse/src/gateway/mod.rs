//! Search gateway: one HTTP exchange per call with the AI search service.
//!
//! [`SearchGateway`] is the seam the retrieval orchestrator depends on. [`PerplexityClient`] is the
//! production implementation; [`MockGateway`] replays scripted replies for tests and demos.
//! Gateways never retry, never cache and never decode structured content; that belongs to
//! [`crate::retrieval`].

mod mock;
mod perplexity;
pub(crate) mod prompts;
pub mod wire;

pub use mock::MockGateway;
pub use perplexity::{
    models, PerplexityClient, SearchAnswer, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL,
};
pub use prompts::SystemPrompts;
pub use wire::{CitationRef, SearchContextSize, UserLocation};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GatewayError;

/// Schema-constrained reply: the raw `content` (a structured value or a JSON-encoded string)
/// plus the top-level sources in service order.
#[derive(Clone, Debug, PartialEq)]
pub struct StructuredResponse {
    pub content: Value,
    pub citations: Vec<CitationRef>,
}

/// Place summary for the insights mode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// The query modes the retrieval layer needs from a search service.
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// One user prompt, no system instruction; returns the answer text.
    async fn basic_query(&self, prompt: &str) -> Result<String, GatewayError>;

    /// Discovery instruction plus `prompt`, output constrained to `schema`, citations requested.
    async fn geo_structured_output_with_citations(
        &self,
        prompt: &str,
        schema: &Value,
    ) -> Result<StructuredResponse, GatewayError>;

    /// Local-guide instruction with the search biased to `location`; returns the answer text.
    async fn location_based_search(
        &self,
        prompt: &str,
        location: &UserLocation,
    ) -> Result<String, GatewayError>;

    /// Personalized visiting advice for one place; returns markdown text.
    async fn location_insights(&self, place: &PlaceSummary) -> Result<String, GatewayError>;
}

/// Text of a plain-mode reply. Structured content is re-encoded rather than rejected.
pub(crate) fn content_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
