use super::common;
use citypulse::MockGateway;

#[tokio::test]
async fn e2e_missing_or_invalid_params_are_400() {
    let (base, gateway) = common::spawn_server(MockGateway::new()).await;

    for path in [
        "/api/local-data?lat=30.5",
        "/api/local-data?lat=abc&lng=1",
        "/api/local-data?lat=95&lng=1",
        "/api/search-local?lat=1&lng=2",
        "/api/search-local?lat=1&lng=2&query=%20%20",
        "/api/local-data-md?lng=2",
        "/api/search-suggestions?lat=1&lng=2",
        "/api/location-insights?name=X&type=park",
    ] {
        let (status, body) = common::get_json(&format!("{}{}", base, path)).await;
        assert_eq!(status, 400, "{}", path);
        assert_eq!(body["success"], false, "{}", path);
        assert!(body["error"].is_string(), "{}", path);
    }
    assert_eq!(gateway.structured_calls(), 0);
    assert_eq!(gateway.text_calls(), 0);
}
