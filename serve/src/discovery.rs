//! Discovery endpoints: structured nearby and query retrieval, debug view, free-text summary,
//! suggestions and place insights.

use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use citypulse::retrieval::{debug_html, DEBUG_COORDINATES};
use citypulse::PlaceSummary;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::response::{coordinates, required, ApiError, ApiResult};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PointQuery {
    lat: Option<String>,
    lng: Option<String>,
    query: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct InsightsQuery {
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    description: Option<String>,
    address: Option<String>,
}

/// GET /api/local-data?lat&lng
pub(crate) async fn local_data(
    State(state): State<AppState>,
    Query(q): Query<PointQuery>,
) -> ApiResult<Json<Value>> {
    let (lat, lng) = coordinates(&q.lat, &q.lng)?;
    info!(lat, lng, "local data");
    let outcome = state.retriever.fetch_nearby(lat, lng).await;
    Ok(Json(to_value(&outcome.envelope())?))
}

/// GET /api/search-local?lat&lng&query
pub(crate) async fn search_local(
    State(state): State<AppState>,
    Query(q): Query<PointQuery>,
) -> ApiResult<Json<Value>> {
    let (lat, lng) = coordinates(&q.lat, &q.lng)?;
    let query = required(&q.query, "query")?;
    info!(lat, lng, query, "search local");
    let outcome = state.retriever.fetch_for_query(lat, lng, query).await;
    Ok(Json(to_value(&outcome.envelope().with_query(query))?))
}

/// GET /api/local-data/debug?lat&lng; both optional.
pub(crate) async fn local_data_debug(
    State(state): State<AppState>,
    Query(q): Query<PointQuery>,
) -> ApiResult<Html<String>> {
    let (lat, lng) = if q.lat.is_none() && q.lng.is_none() {
        DEBUG_COORDINATES
    } else {
        coordinates(&q.lat, &q.lng)?
    };
    let outcome = state.retriever.fetch_debug(lat, lng).await;
    Ok(Html(debug_html(&outcome)))
}

/// GET /api/local-data-md?lat&lng[&country]
pub(crate) async fn local_data_md(
    State(state): State<AppState>,
    Query(q): Query<PointQuery>,
) -> ApiResult<Json<Value>> {
    let (lat, lng) = coordinates(&q.lat, &q.lng)?;
    let text = state
        .retriever
        .fetch_nearby_text(lat, lng, q.country.as_deref())
        .await
        .map_err(|e| ApiError::upstream(e.to_string()))?;
    Ok(Json(json!({ "data": text })))
}

/// GET /api/search-suggestions?query&lat&lng
pub(crate) async fn search_suggestions(
    State(state): State<AppState>,
    Query(q): Query<PointQuery>,
) -> ApiResult<Json<Value>> {
    let partial = required(&q.query, "query")?;
    let (lat, lng) = coordinates(&q.lat, &q.lng)?;
    let body = match state.retriever.fetch_suggestions(lat, lng, partial).await {
        Ok(suggestions) => json!({"success": true, "suggestions": suggestions}),
        Err(_) => json!({"success": false, "suggestions": []}),
    };
    Ok(Json(body))
}

/// GET /api/location-insights?name&type&description[&address]
pub(crate) async fn location_insights(
    State(state): State<AppState>,
    Query(q): Query<InsightsQuery>,
) -> ApiResult<Json<Value>> {
    let place = PlaceSummary {
        name: required(&q.name, "name")?.to_string(),
        kind: required(&q.kind, "type")?.to_string(),
        description: required(&q.description, "description")?.to_string(),
        address: q.address.filter(|a| !a.trim().is_empty()),
    };
    let body = match state.retriever.fetch_insights(&place).await {
        Ok(insights) => json!({"success": true, "insights": insights}),
        Err(e) => json!({"success": false, "error": e.to_string()}),
    };
    Ok(Json(body))
}

fn to_value<T: serde::Serialize>(v: &T) -> ApiResult<Value> {
    serde_json::to_value(v).map_err(|e| ApiError::internal(e.to_string()))
}
