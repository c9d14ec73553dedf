//! HTTP server for CityPulse (axum).
//!
//! Serves the discovery and share-link JSON API plus minimal HTML shells. Listens on
//! `127.0.0.1:5001` unless told otherwise.
//!
//! **Public API**: [`run_serve`], [`run_serve_on_listener`], [`AppState`].

mod app;
mod discovery;
mod page;
mod response;
mod share;

pub use app::AppState;

use tokio::net::TcpListener;
use tracing::info;

use app::router;

pub const DEFAULT_ADDR: &str = config::DEFAULT_ADDR;

/// Runs the server on an existing listener. Used by tests (bind to 127.0.0.1:0 then pass listener).
pub async fn run_serve_on_listener(
    listener: TcpListener,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = listener.local_addr()?;
    info!("CityPulse listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Runs the server on `addr` (default 127.0.0.1:5001).
pub async fn run_serve(
    addr: Option<&str>,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = addr.unwrap_or(DEFAULT_ADDR);
    let listener = TcpListener::bind(addr).await?;
    run_serve_on_listener(listener, state).await
}
