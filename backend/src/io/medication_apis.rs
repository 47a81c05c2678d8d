//! # REST API for Medication Supply
//!
//! The consume/restock endpoint.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Json};
use tracing::info;

use crate::io::require_user;
use crate::AppState;
use shared::ConsumeRequest;

/// Record a dose taken (or a restock) for one medication.
///
/// The body is optional; an absent or empty body means "one dose taken".
pub async fn consume(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((member_id, med_id)): Path<(String, String)>,
    request: Option<Json<ConsumeRequest>>,
) -> impl IntoResponse {
    info!(
        "POST /api/members/{}/medications/{}/consume",
        member_id, med_id
    );

    let caller = match require_user(&state, &headers).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };
    let change = request.and_then(|Json(r)| r.change);
    match state
        .medication_service
        .consume(&caller, &member_id, &med_id, change)
        .await
    {
        Ok(response) => Json(response).into_response(),
        Err(e) => e.into_response(),
    }
}
