//! # REST API for the Activity Log

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};
use tracing::info;

use crate::io::require_user;
use crate::AppState;
use shared::CreateLogRequest;

/// The caller's family log, newest first.
pub async fn list_logs(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("GET /api/logs");

    let caller = match require_user(&state, &headers).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };
    match state.log_service.list_logs(&caller).await {
        Ok(logs) => (StatusCode::OK, Json(logs)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Append a free-text entry to the caller's family log.
pub async fn create_log(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateLogRequest>,
) -> impl IntoResponse {
    info!("POST /api/logs");

    let caller = match require_user(&state, &headers).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };
    match state.log_service.create_log(&caller, request).await {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(e) => e.into_response(),
    }
}
