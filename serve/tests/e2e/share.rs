use super::common;
use citypulse::MockGateway;
use serde_json::json;

#[tokio::test]
async fn e2e_share_round_trip() {
    let (base, _) = common::spawn_server(MockGateway::new()).await;

    let (status, created) = common::post_json(
        &format!("{}/api/share-location", base),
        &json!({
            "name": "Zilker Park",
            "type": "event",
            "description": "Kite festival",
            "address": "2100 Barton Springs Rd",
            "latitude": "30.2669",
            "longitude": -97.7729
        }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(created["success"], true);
    let id = created["location_id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 8);
    assert_eq!(created["share_url"], format!("/shared/{}", id));

    let (status, fetched) =
        common::get_json(&format!("{}/api/get-shared-location/{}", base, id)).await;
    assert_eq!(status, 200);
    assert_eq!(fetched["success"], true);
    assert_eq!(fetched["data"]["id"], id.as_str());
    assert_eq!(fetched["data"]["name"], "Zilker Park");
    assert_eq!(fetched["data"]["type"], "event");
    assert_eq!(fetched["data"]["latitude"], 30.2669);
    assert!(fetched["data"]["shared_at"].is_string());

    let (_, listed) = common::get_json(&format!("{}/api/shared-locations", base)).await;
    assert_eq!(listed, json!({"shared_locations": [id], "count": 1}));
}

#[tokio::test]
async fn e2e_unknown_share_id() {
    let (base, _) = common::spawn_server(MockGateway::new()).await;
    let (status, body) =
        common::get_json(&format!("{}/api/get-shared-location/nope1234", base)).await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({"success": false, "error": "Shared location not found"})
    );
}

#[tokio::test]
async fn e2e_share_rejects_non_json_body() {
    let (base, _) = common::spawn_server(MockGateway::new()).await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/share-location", base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
}
