//! # REST API for Authentication
//!
//! Registration, login, logout, and the current-user projection.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};
use serde_json::json;
use tracing::info;

use crate::io::{bearer_token, require_user};
use crate::AppState;
use shared::{LoginRequest, RegisterRequest};

/// Register a new user and return a session token.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/register - username: {:?}", request.username);

    match state.auth_service.register(request).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Log in with username and password.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/login - username: {:?}", request.username);

    match state.auth_service.login(request).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Revoke the caller's token. Always succeeds.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("POST /api/auth/logout");

    if let Some(token) = bearer_token(&headers) {
        state.auth_service.logout(&token).await;
    }
    Json(json!({ "ok": true }))
}

/// The current user, without the credential.
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("GET /api/me");

    match require_user(&state, &headers).await {
        Ok(user) => (StatusCode::OK, Json(user.view())).into_response(),
        Err(e) => e.into_response(),
    }
}
