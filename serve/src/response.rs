//! Error responses: `{success: false, error}` with an HTTP status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Handler error carrying the status to answer with.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub(crate) status: StatusCode,
    pub(crate) message: String,
}

impl ApiError {
    pub(crate) fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400: missing or unparsable request input.
    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 502: the search service failed.
    pub(crate) fn upstream(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({"success": false, "error": self.message}));
        (self.status, body).into_response()
    }
}

impl From<citypulse::ShareError> for ApiError {
    fn from(e: citypulse::ShareError) -> Self {
        ApiError::internal(e.to_string())
    }
}

/// Required query parameter, trimmed; blank counts as missing.
pub(crate) fn required<'a>(value: &'a Option<String>, name: &str) -> ApiResult<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::bad_request(format!("missing query parameter: {}", name))),
    }
}

/// Required coordinate pair in WGS84 range.
pub(crate) fn coordinates(lat: &Option<String>, lng: &Option<String>) -> ApiResult<(f64, f64)> {
    let lat = degrees(required(lat, "lat")?, "lat", 90.0)?;
    let lng = degrees(required(lng, "lng")?, "lng", 180.0)?;
    Ok((lat, lng))
}

fn degrees(raw: &str, name: &str, limit: f64) -> ApiResult<f64> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && (-limit..=limit).contains(&v) => Ok(v),
        _ => Err(ApiError::bad_request(format!(
            "invalid {}: {} (expected decimal degrees within ±{})",
            name, raw, limit
        ))),
    }
}
