use super::common;
use citypulse::{CitationRef, GatewayError, MockGateway};
use serde_json::json;

fn restaurant() -> serde_json::Value {
    json!({
        "events": [],
        "restaurants": [{
            "id": "restaurant_001",
            "name": "Blue Bottle",
            "description": "Specialty coffee",
            "website": "https://bluebottle.example.com"
        }],
        "alerts": []
    })
}

#[tokio::test]
async fn e2e_local_data_retries_until_data() {
    let gateway = MockGateway::new()
        .with_structured(json!({"events": [], "restaurants": [], "alerts": []}))
        .with_structured_and_citations(
            restaurant(),
            vec![CitationRef {
                url: "https://yelp.example.com".into(),
                title: Some("Yelp".into()),
                date: None,
            }],
        );
    let (base, gateway) = common::spawn_server(gateway).await;

    let (status, body) =
        common::get_json(&format!("{}/api/local-data?lat=30.59&lng=-97.86", base)).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["attempt"], 2);
    assert_eq!(body["data"]["restaurants"][0]["name"], "Blue Bottle");
    assert_eq!(body["citations"][0]["url"], "https://yelp.example.com");
    assert_eq!(gateway.structured_calls(), 2);
}

#[tokio::test]
async fn e2e_local_data_failure_envelope() {
    let mut gateway = MockGateway::new();
    for _ in 0..3 {
        gateway = gateway.with_structured_error(GatewayError::Status {
            status: 503,
            body: "unavailable".into(),
        });
    }
    let (base, _) = common::spawn_server(gateway).await;

    let (status, body) =
        common::get_json(&format!("{}/api/local-data?lat=1&lng=2", base)).await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({"success": false, "error": "search API error 503: unavailable", "attempt": 3})
    );
}

#[tokio::test]
async fn e2e_search_local_echoes_query() {
    let (base, gateway) = common::spawn_server(MockGateway::new().with_structured(restaurant())).await;

    let (status, body) = common::get_json(&format!(
        "{}/api/search-local?lat=30.59&lng=-97.86&query=coffee%20nearby",
        base
    ))
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["query"], "coffee nearby");
    assert_eq!(body["attempt"], 1);
    assert!(gateway.prompts()[0].contains("\"coffee nearby\""));
}

#[tokio::test]
async fn e2e_debug_defaults_coordinates() {
    let (base, gateway) = common::spawn_server(MockGateway::new().with_structured(restaurant())).await;

    let (status, html) = common::get_text(&format!("{}/api/local-data/debug", base)).await;
    assert_eq!(status, 200);
    assert!(html.contains("Debug: Structured Response (Attempt 1)"));
    assert!(html.contains("Blue Bottle"));
    assert!(gateway.prompts()[0].contains("30.59077127702062, -97.8626356236235"));
}

#[tokio::test]
async fn e2e_local_data_md_returns_text() {
    let gateway = MockGateway::new().with_text("Farmers market on 2nd St until noon.");
    let (base, _) = common::spawn_server(gateway).await;

    let (status, body) =
        common::get_json(&format!("{}/api/local-data-md?lat=30.2&lng=-97.7", base)).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"data": "Farmers market on 2nd St until noon."}));
}

#[tokio::test]
async fn e2e_local_data_md_upstream_error() {
    let gateway = MockGateway::new().with_text_error(GatewayError::Transport("refused".into()));
    let (base, _) = common::spawn_server(gateway).await;

    let (status, body) =
        common::get_json(&format!("{}/api/local-data-md?lat=30.2&lng=-97.7", base)).await;
    assert_eq!(status, 502);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn e2e_suggestions_success_and_failure() {
    let gateway = MockGateway::new()
        .with_text(r#"["coffee shops near me", "coffee roasters", "cold brew"]"#)
        .with_text_error(GatewayError::Transport("refused".into()));
    let (base, _) = common::spawn_server(gateway).await;
    let url = format!("{}/api/search-suggestions?query=cof&lat=30.2&lng=-97.7", base);

    let (_, body) = common::get_json(&url).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 3);

    let (status, body) = common::get_json(&url).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"success": false, "suggestions": []}));
}

#[tokio::test]
async fn e2e_location_insights() {
    let gateway = MockGateway::new()
        .with_text("1. **Best Times to Visit** - weekday mornings")
        .with_text_error(GatewayError::Status {
            status: 401,
            body: "bad key".into(),
        });
    let (base, _) = common::spawn_server(gateway).await;
    let url = format!(
        "{}/api/location-insights?name=Blue%20Bottle&type=restaurant&description=Coffee",
        base
    );

    let (_, body) = common::get_json(&url).await;
    assert_eq!(body["success"], true);
    assert!(body["insights"].as_str().unwrap().contains("Best Times"));

    let (status, body) = common::get_json(&url).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "search API error 401: bad key");
}
