//! Axum app: shared state and router.
//!
//! Every handler reads the retriever, share store and map key from [`AppState`]; nothing is
//! global.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use citypulse::{
    ConfigError, InMemoryShareStore, PerplexityClient, RetrievalPolicy, Retriever, SearchGateway,
    ShareStore,
};
use config::Settings;

use crate::{discovery, page, share};

/// Shared state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub retriever: Retriever,
    pub shares: Arc<dyn ShareStore>,
    /// Browser map key injected into the HTML shell; empty when unset.
    pub maps_api_key: String,
}

impl AppState {
    /// State over any gateway with an in-memory share store.
    pub fn new(gateway: Arc<dyn SearchGateway>, policy: RetrievalPolicy) -> Self {
        Self {
            retriever: Retriever::new(gateway).with_policy(policy),
            shares: Arc::new(InMemoryShareStore::new()),
            maps_api_key: String::new(),
        }
    }

    /// Production state: Perplexity client from settings. Fails without an API key.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let client = PerplexityClient::new(settings.perplexity_api_key.clone().unwrap_or_default())?
            .with_base_url(settings.base_url.clone());
        let policy = RetrievalPolicy::new(settings.max_attempts, settings.attempt_timeout);
        Ok(Self::new(Arc::new(client), policy)
            .with_maps_api_key(settings.maps_api_key.clone().unwrap_or_default()))
    }

    pub fn with_maps_api_key(mut self, key: impl Into<String>) -> Self {
        self.maps_api_key = key.into();
        self
    }

    pub fn with_share_store(mut self, shares: Arc<dyn ShareStore>) -> Self {
        self.shares = shares;
        self
    }
}

/// Builds the router: discovery and share JSON endpoints plus the two HTML shells.
pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route("/shared/:id", get(page::shared))
        .route("/api/local-data", get(discovery::local_data))
        .route("/api/search-local", get(discovery::search_local))
        .route("/api/local-data/debug", get(discovery::local_data_debug))
        .route("/api/local-data-md", get(discovery::local_data_md))
        .route("/api/search-suggestions", get(discovery::search_suggestions))
        .route("/api/location-insights", get(discovery::location_insights))
        .route("/api/share-location", post(share::share_location))
        .route("/api/get-shared-location/:id", get(share::get_shared_location))
        .route("/api/shared-locations", get(share::shared_locations))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn from_settings_requires_api_key() {
        let settings = Settings::default();
        assert!(matches!(
            AppState::from_settings(&settings),
            Err(ConfigError::MissingApiKey { .. })
        ));
    }

    #[test]
    fn from_settings_applies_policy_and_map_key() {
        let settings = Settings {
            perplexity_api_key: Some("k".into()),
            maps_api_key: Some("maps".into()),
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(7),
            ..Settings::default()
        };
        let state = AppState::from_settings(&settings).unwrap();
        assert_eq!(state.retriever.policy(), RetrievalPolicy::new(3, Duration::from_secs(7)));
        assert_eq!(state.maps_api_key, "maps");
    }
}
