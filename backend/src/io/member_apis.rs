//! # REST API for Member Management
//!
//! Endpoints for listing, creating, and updating family members.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};
use tracing::info;

use crate::io::require_user;
use crate::AppState;
use shared::{CreateMemberRequest, UpdateMemberRequest};

/// List the caller's family members. Head-of-family only.
pub async fn list_members(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("GET /api/members");

    let caller = match require_user(&state, &headers).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };
    match state.member_service.list_members(&caller).await {
        Ok(members) => (StatusCode::OK, Json(members)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a member in the caller's family. Head-of-family only.
pub async fn create_member(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateMemberRequest>,
) -> impl IntoResponse {
    info!("POST /api/members - name: {:?}", request.name);

    let caller = match require_user(&state, &headers).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };
    match state.member_service.create_member(&caller, request).await {
        Ok(member) => (StatusCode::CREATED, Json(member)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update a member of the caller's family. Head-of-family only.
pub async fn update_member(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(member_id): Path<String>,
    Json(request): Json<UpdateMemberRequest>,
) -> impl IntoResponse {
    info!("PUT /api/members/{}", member_id);

    let caller = match require_user(&state, &headers).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };
    match state
        .member_service
        .update_member(&caller, &member_id, request)
        .await
    {
        Ok(member) => (StatusCode::OK, Json(member)).into_response(),
        Err(e) => e.into_response(),
    }
}
