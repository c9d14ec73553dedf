//! Share-link endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use citypulse::ShareRequest;
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::response::{ApiError, ApiResult};

/// POST /api/share-location
pub(crate) async fn share_location(
    State(state): State<AppState>,
    body: Result<Json<ShareRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let shared = state.shares.put(request).await?;
    info!(id = %shared.id, "location shared");
    Ok(Json(json!({
        "success": true,
        "location_id": shared.id,
        "share_url": shared.share_path(),
    })))
}

/// GET /api/get-shared-location/{id}. Unknown ids answer 200 with `success: false`.
pub(crate) async fn get_shared_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let body = match state.shares.get(&id).await? {
        Some(shared) => json!({"success": true, "data": shared}),
        None => json!({"success": false, "error": "Shared location not found"}),
    };
    Ok(Json(body))
}

/// GET /api/shared-locations
pub(crate) async fn shared_locations(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let ids = state.shares.list_ids().await?;
    Ok(Json(json!({"count": ids.len(), "shared_locations": ids})))
}
