//! Error types for construction, the search-service gateway, structured content and sharing.

use std::time::Duration;

use thiserror::Error;

/// Startup-time failure; fatal, never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key is required: set {var} or pass it directly")]
    MissingApiKey { var: &'static str },
    #[error("embedded prompts: {0}")]
    Prompts(String),
    #[error("http client: {0}")]
    HttpClient(String),
}

/// One failed exchange with the search service. The gateway never retries; the orchestrator
/// decides whether another attempt is made.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("search API error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::Transport(e.to_string())
    }
}

/// Structured content that does not match the local-info schema.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("structured content is empty")]
    Empty,
    #[error("structured content is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("structured content must be an object, got {0}")]
    NotAnObject(&'static str),
    #[error("structured content does not match schema: {0}")]
    Schema(#[source] serde_json::Error),
}

/// Failure of a share-link store backend.
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("share store: {0}")]
    Backend(String),
}
