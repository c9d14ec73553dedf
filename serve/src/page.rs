//! Minimal HTML shells: the browser app loads its own assets and calls the JSON endpoints.

use axum::{
    extract::{Path, State},
    response::Html,
};

use crate::app::AppState;

/// GET /
pub(crate) async fn index(State(state): State<AppState>) -> Html<String> {
    Html(shell(&state.maps_api_key, None))
}

/// GET /shared/{id}
pub(crate) async fn shared(State(state): State<AppState>, Path(id): Path<String>) -> Html<String> {
    Html(shell(&state.maps_api_key, Some(&id)))
}

fn shell(maps_api_key: &str, shared_id: Option<&str>) -> String {
    let shared = shared_id
        .map(|id| format!("window.sharedLocationId = {};\n", js_string(id)))
        .unwrap_or_default();
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>CityPulse</title>
<script>
window.googleMapsApiKey = {key};
{shared}</script>
</head>
<body>
<div id="map"></div>
<div id="results"></div>
</body>
</html>
"#,
        key = js_string(maps_api_key),
        shared = shared,
    )
}

/// JSON string literal that is also safe inside a `<script>` element.
fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string())
        .to_string()
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}
