//! Shared API error type and service-info handlers.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Name reported by the info and health endpoints.
pub const SERVICE_NAME: &str = "Govi Gateway";

/// API error type.
///
/// Every variant surfaces as `500` with `{"error": message}` and
/// `Cache-Control: no-store`; the variant only decides the message and the
/// log line.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Required settings are absent.
    #[error("configuration error: {0}")]
    Config(String),
    /// The credential issuer or proxied backend failed.
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

impl From<govi_voice::VoiceError> for ApiError {
    fn from(err: govi_voice::VoiceError) -> Self {
        match err {
            govi_voice::VoiceError::Config(msg) => ApiError::Config(msg),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Config(_) => tracing::error!("{self}"),
            ApiError::Upstream(_) => tracing::warn!("{self}"),
            ApiError::Internal(_) => tracing::error!("{self}"),
        }

        error_response(StatusCode::INTERNAL_SERVER_ERROR, &self.to_string())
    }
}

/// `{"error": message}` with `Cache-Control: no-store`.
///
/// Shared by handlers and middleware so every failure on the credential
/// routes has the same shape.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    let body = Json(json!({
        "error": message
    }));

    let mut response = (status, body).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

/// Handler for `GET /`.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "status": "online",
        "version": env!("CARGO_PKG_VERSION"),
        "service": SERVICE_NAME,
        "health_check": "/health"
    }))
}

/// Handler for `GET /health`.
///
/// Used by load balancers and CI to verify the server is running.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
