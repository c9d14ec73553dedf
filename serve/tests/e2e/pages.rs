use super::common;
use citypulse::MockGateway;

#[tokio::test]
async fn e2e_index_and_shared_shells() {
    let (base, _) = common::spawn_server(MockGateway::new()).await;

    let (status, html) = common::get_text(&format!("{}/", base)).await;
    assert_eq!(status, 200);
    assert!(html.contains(r#"window.googleMapsApiKey = "test-maps-key";"#));
    assert!(!html.contains("sharedLocationId"));

    let (status, html) = common::get_text(&format!("{}/shared/ab12cd34", base)).await;
    assert_eq!(status, 200);
    assert!(html.contains(r#"window.sharedLocationId = "ab12cd34";"#));
}
