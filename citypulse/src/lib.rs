//! # CityPulse
//!
//! Structured local-discovery retrieval on top of an AI search service: given a point (and
//! optionally a free-text query), find live events, open restaurants and area alerts, typed and
//! normalized, with the service's source citations passed through.
//!
//! ## Flow
//!
//! 1. A discovery operation on [`Retriever`] builds a prompt for the point or query.
//! 2. The [`SearchGateway`] sends it with [`LOCAL_INFO_SCHEMA`] as the output constraint
//!    ([`PerplexityClient`] in production, [`MockGateway`] in tests).
//! 3. The reply content is decoded into [`LocalInfo`] and normalized.
//! 4. Empty results and failed attempts are retried up to [`RetrievalPolicy::max_attempts`];
//!    the run ends in a [`RetrievalOutcome`] carrying the attempt count.
//!
//! ## Main modules
//!
//! - [`schema`]: [`LocalInfo`], [`Event`], [`Restaurant`], [`Alert`], [`LOCAL_INFO_SCHEMA`],
//!   [`decode_local_info`].
//! - [`gateway`]: [`SearchGateway`] trait, [`PerplexityClient`], [`MockGateway`], wire types.
//! - [`retrieval`]: [`Retriever`], [`RetrievalPolicy`], [`RetrievalOutcome`], suggestions and
//!   debug rendering.
//! - [`share`]: [`ShareStore`] trait and [`InMemoryShareStore`].
//! - [`error`]: [`ConfigError`], [`GatewayError`], [`ContentError`], [`ShareError`].

pub mod error;
pub mod gateway;
pub mod retrieval;
pub mod schema;
pub mod share;

pub use error::{ConfigError, ContentError, GatewayError, ShareError};
pub use gateway::{
    CitationRef, MockGateway, PerplexityClient, PlaceSummary, SearchGateway, StructuredResponse,
    UserLocation,
};
pub use retrieval::{RetrievalOutcome, RetrievalPolicy, Retriever};
pub use schema::{decode_local_info, Alert, Event, LocalInfo, Restaurant, LOCAL_INFO_SCHEMA};
pub use share::{InMemoryShareStore, ShareRequest, ShareStore, SharedLocation};

#[cfg(test)]
mod test_logging {
    use ctor::ctor;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::Layer;

    #[ctor]
    fn init() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_filter(filter),
            )
            .try_init();
    }
}
