//! Connection-details and worker-start handlers.

use crate::api::ApiError;
use crate::AppState;
use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use govi_types::{ConnectionDetails, PartialConnectionDetails};
use serde_json::json;
use std::sync::Arc;

/// Handler for `GET /api/connection-details`.
///
/// Relays the configured backend's document when one is set, otherwise signs
/// a fresh token locally. Responses are never cacheable.
pub async fn connection_details_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let details = match state.config.backend.connection_details_url.as_deref() {
        Some(url) => fetch_upstream_details(&state, url).await?,
        None => {
            if !state.token_service.is_enabled() {
                return Err(ApiError::Config(format!(
                    "livekit credentials are not configured (missing: {}); set GOVI_LIVEKIT_URL, \
                     GOVI_LIVEKIT_API_KEY and GOVI_LIVEKIT_API_SECRET",
                    state.token_service.config().missing_fields().join(", ")
                )));
            }
            state.token_service.issue_connection_details()?
        }
    };

    tracing::info!(
        room = %details.room_name,
        participant = %details.participant_name,
        "issued connection details"
    );

    Ok(([(header::CACHE_CONTROL, "no-store")], Json(details)))
}

async fn fetch_upstream_details(
    state: &AppState,
    url: &str,
) -> Result<ConnectionDetails, ApiError> {
    let resp = state
        .http
        .get(url)
        .send()
        .await
        .map_err(|e| ApiError::Upstream(format!("connection-details backend unreachable: {e}")))?;

    if !resp.status().is_success() {
        return Err(ApiError::Upstream(format!(
            "connection-details backend returned status {}",
            resp.status()
        )));
    }

    let partial: PartialConnectionDetails = resp.json().await.map_err(|e| {
        ApiError::Upstream(format!("invalid connection-details backend response: {e}"))
    })?;

    ConnectionDetails::try_from(partial).map_err(|e| ApiError::Upstream(e.to_string()))
}

/// Handler for `POST /api/start-worker`.
///
/// Forwards the request to the configured worker endpoint. The caller only
/// relies on the status; the upstream body is ignored.
pub async fn start_worker_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let url = state
        .config
        .backend
        .worker_start_url
        .as_deref()
        .ok_or_else(|| {
            ApiError::Config(
                "worker start URL is not configured; set GOVI_BACKEND_WORKER_URL".to_string(),
            )
        })?;

    let resp = state
        .http
        .post(url)
        .send()
        .await
        .map_err(|e| ApiError::Upstream(format!("worker backend unreachable: {e}")))?;

    if !resp.status().is_success() {
        return Err(ApiError::Upstream(format!(
            "worker backend returned status {}",
            resp.status()
        )));
    }

    tracing::info!("assistant worker start requested");

    Ok((
        StatusCode::ACCEPTED,
        [(header::CACHE_CONTROL, "no-store")],
        Json(json!({ "status": "worker start requested" })),
    ))
}
