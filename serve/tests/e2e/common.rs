//! Shared helpers for e2e tests. Responses are logged with `[e2e] received: ...`; run with
//! `--nocapture` to see them.

use std::sync::Arc;
use std::time::Duration;

use citypulse::{MockGateway, RetrievalPolicy};
use serde_json::Value;
use serve::AppState;
use tokio::net::TcpListener;

/// Small budget and short timeout so exhaustion paths stay fast.
pub fn test_policy() -> RetrievalPolicy {
    RetrievalPolicy::new(3, Duration::from_secs(5))
}

/// Bind to a random port and spawn the server over `gateway`. Returns (base_url, gateway).
pub async fn spawn_server(gateway: MockGateway) -> (String, Arc<MockGateway>) {
    let gateway = Arc::new(gateway);
    let state = AppState::new(gateway.clone(), test_policy()).with_maps_api_key("test-maps-key");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve::run_serve_on_listener(listener, state));
    (format!("http://{}", addr), gateway)
}

pub async fn get_json(url: &str) -> (u16, Value) {
    let resp = reqwest::get(url).await.unwrap();
    let status = resp.status().as_u16();
    let body: Value = resp.json().await.unwrap();
    eprintln!("[e2e] received: {} {}", status, body);
    (status, body)
}

pub async fn get_text(url: &str) -> (u16, String) {
    let resp = reqwest::get(url).await.unwrap();
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap();
    eprintln!("[e2e] received: {} {}", status, body);
    (status, body)
}

pub async fn post_json(url: &str, body: &Value) -> (u16, Value) {
    let resp = reqwest::Client::new().post(url).json(body).send().await.unwrap();
    let status = resp.status().as_u16();
    let body: Value = resp.json().await.unwrap();
    eprintln!("[e2e] received: {} {}", status, body);
    (status, body)
}
