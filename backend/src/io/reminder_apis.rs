//! # REST API for Reminder Triggers
//!
//! The prototype has no wall-clock scheduler; reminders fire only on this
//! explicit trigger.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Json};
use tracing::info;

use crate::io::require_user;
use crate::AppState;
use shared::TriggerReminderRequest;

/// Run the escalation flow for one medication dose and return its events.
pub async fn trigger_reminder(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<TriggerReminderRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/reminders/trigger - member: {:?}, medication: {:?}",
        request.member_id, request.medication_id
    );

    let caller = match require_user(&state, &headers).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };
    match state.reminder_service.trigger(&caller, request).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => e.into_response(),
    }
}
