//! Retry-until-useful retrieval of local information.
//!
//! [`Retriever`] drives a [`SearchGateway`]: each attempt is one schema-constrained call bounded
//! by the per-attempt timeout, decoded and normalized into [`LocalInfo`]. A run stops at the
//! first attempt with data; an empty result is only accepted from the last attempt of the
//! budget, and a failure only surfaces when it happens on that last attempt. Attempts are
//! sequential with no delay between them.

mod debug;
mod outcome;
pub mod prompt;
mod suggestions;

pub use debug::{debug_html, DEBUG_COORDINATES};
pub use outcome::{Envelope, RetrievalOutcome};
pub use suggestions::{parse_suggestions, SuggestionError, MAX_SUGGESTIONS};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, info_span, warn, Instrument};

use crate::error::{ContentError, GatewayError};
use crate::gateway::{CitationRef, PlaceSummary, SearchGateway, UserLocation};
use crate::schema::{decode_local_info, LocalInfo, LOCAL_INFO_SCHEMA};

pub const DEFAULT_MAX_ATTEMPTS: usize = 10;
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(45);
/// Country sent with location-biased text searches when the caller gives none.
pub const DEFAULT_COUNTRY: &str = "US";

/// Attempt budget and per-attempt time limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalPolicy {
    /// Total attempts including the first; values below 1 are treated as 1.
    pub max_attempts: usize,
    /// A gateway call running longer than this counts as a failed attempt.
    pub attempt_timeout: Duration,
}

impl Default for RetrievalPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }
}

impl RetrievalPolicy {
    pub fn new(max_attempts: usize, attempt_timeout: Duration) -> Self {
        Self {
            max_attempts,
            attempt_timeout,
        }
    }

    fn budget(&self) -> usize {
        self.max_attempts.max(1)
    }
}

/// Why one attempt produced no usable structure.
#[derive(Debug, thiserror::Error)]
enum AttemptError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Content(#[from] ContentError),
}

/// Discovery operations over a search gateway.
///
/// Cheap to clone; clones share the gateway. Concurrent runs are independent.
#[derive(Clone)]
pub struct Retriever {
    gateway: Arc<dyn SearchGateway>,
    policy: RetrievalPolicy,
}

impl Retriever {
    pub fn new(gateway: Arc<dyn SearchGateway>) -> Self {
        Self {
            gateway,
            policy: RetrievalPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetrievalPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RetrievalPolicy {
        self.policy
    }

    /// Events, restaurants and alerts near a point.
    pub async fn fetch_nearby(&self, lat: f64, lng: f64) -> RetrievalOutcome {
        self.retrieve(&prompt::nearby(lat, lng))
            .instrument(info_span!("retrieve", kind = "nearby", lat, lng))
            .await
    }

    /// Results for a free-text query near a point, categorized by the service.
    pub async fn fetch_for_query(&self, lat: f64, lng: f64, query: &str) -> RetrievalOutcome {
        self.retrieve(&prompt::for_query(lat, lng, query))
            .instrument(info_span!("retrieve", kind = "query", lat, lng, query))
            .await
    }

    /// Same as [`Retriever::fetch_nearby`], logged as a debug run. Render with [`debug_html`].
    pub async fn fetch_debug(&self, lat: f64, lng: f64) -> RetrievalOutcome {
        self.retrieve(&prompt::nearby(lat, lng))
            .instrument(info_span!("retrieve", kind = "debug", lat, lng))
            .await
    }

    /// Unstructured summary of what is going on near a point. One attempt.
    pub async fn fetch_nearby_text(
        &self,
        lat: f64,
        lng: f64,
        country: Option<&str>,
    ) -> Result<String, GatewayError> {
        let location = UserLocation {
            latitude: lat,
            longitude: lng,
            country: country.unwrap_or(DEFAULT_COUNTRY).to_string(),
        };
        let prompt = prompt::nearby_text(lat, lng);
        self.bounded(self.gateway.location_based_search(&prompt, &location))
            .await
    }

    /// Markdown visiting advice for one place. One attempt.
    pub async fn fetch_insights(&self, place: &PlaceSummary) -> Result<String, GatewayError> {
        let result = self.bounded(self.gateway.location_insights(place)).await;
        if let Err(e) = &result {
            warn!(place = %place.name, error = %e, "location insights failed");
        }
        result
    }

    /// Up to five search terms completing `partial` near a point. One attempt.
    pub async fn fetch_suggestions(
        &self,
        lat: f64,
        lng: f64,
        partial: &str,
    ) -> Result<Vec<String>, SuggestionError> {
        let answer = self
            .bounded(self.gateway.basic_query(&prompt::suggestions(partial, lat, lng)))
            .await;
        let parsed = answer.map_err(SuggestionError::from).and_then(|a| parse_suggestions(&a));
        if let Err(e) = &parsed {
            warn!(error = %e, "search suggestions failed");
        }
        parsed
    }

    /// The retry loop behind every structured discovery operation.
    pub async fn retrieve(&self, prompt: &str) -> RetrievalOutcome {
        let budget = self.policy.budget();
        let mut attempt = 1;
        loop {
            let last = attempt == budget;
            match self.attempt(prompt).await {
                Ok((data, citations)) if data.has_data() || last => {
                    if data.has_data() {
                        info!(attempt, items = data.len(), citations = citations.len(), "accepted");
                    } else {
                        warn!(attempt, "attempt budget exhausted, accepting empty result");
                    }
                    return RetrievalOutcome::Success {
                        data,
                        citations,
                        attempts: attempt,
                    };
                }
                Ok(_) => {
                    info!(attempt, max_attempts = budget, reason = "empty result", "retrying");
                }
                Err(e) => {
                    warn!(attempt, max_attempts = budget, reason = %e, "attempt failed");
                    if last {
                        return RetrievalOutcome::Failure {
                            error: e.to_string(),
                            attempts: attempt,
                        };
                    }
                }
            }
            attempt += 1;
        }
    }

    async fn attempt(&self, prompt: &str) -> Result<(LocalInfo, Vec<CitationRef>), AttemptError> {
        let response = self
            .bounded(
                self.gateway
                    .geo_structured_output_with_citations(prompt, &LOCAL_INFO_SCHEMA),
            )
            .await?;
        let mut data = decode_local_info(&response.content)?;
        data.normalize();
        Ok((data, response.citations))
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, GatewayError>
    where
        F: Future<Output = Result<T, GatewayError>>,
    {
        let limit = self.policy.attempt_timeout;
        tokio::time::timeout(limit, call)
            .await
            .map_err(|_| GatewayError::Timeout(limit))?
    }
}
