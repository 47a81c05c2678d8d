//! # REST API Interface Layer
//!
//! HTTP endpoints for the med reminder application. This layer handles:
//! - request/response serialization
//! - bearer-token resolution
//! - error translation from domain errors to HTTP status codes
//! - request logging
//!
//! Pure translation layer: no business logic lives here.

pub mod auth_apis;
pub mod log_apis;
pub mod medication_apis;
pub mod member_apis;
pub mod reminder_apis;

use axum::http::{header, HeaderMap};
use axum::response::Json;
use serde_json::{json, Value};
use shared::User;

use crate::error::{Result, ServiceError};
use crate::AppState;

/// Pull the token out of an `Authorization: Bearer ...` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Resolve the calling user from the request headers, or fail with 401.
pub(crate) async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<User> {
    let token = bearer_token(headers)
        .ok_or_else(|| ServiceError::Unauthorized("missing bearer token".to_string()))?;
    state.auth_service.authenticate(&token).await
}

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc-123"),
        );
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_missing_or_malformed_header_yields_none() {
        assert!(bearer_token(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("abc-123"));
        assert!(bearer_token(&headers).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(bearer_token(&headers).is_none());
    }
}
