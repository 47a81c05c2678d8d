//! Centralized error handling for the med reminder backend.
//!
//! Every domain failure maps to one of these variants, and each variant maps
//! to exactly one HTTP status. All failures are terminal and synchronous;
//! the one asynchronous path (the outbound call webhook) never produces a
//! `ServiceError` at all.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Missing or malformed input (e.g. no name on member creation)
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing, unknown, or revoked bearer token
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but lacking the required role
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource lookup failure (member, medication, family)
    #[error("{0} not found")]
    NotFound(String),

    /// Resource already exists (e.g. duplicate username)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure (state file unwritable, serialization)
    #[error("internal service error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        if let ServiceError::Internal(ref e) = self {
            error!("Internal error: {:#}", e);
        }
        (self.status(), self.to_string()).into_response()
    }
}

/// A specialized Result type for domain logic.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServiceError::Validation("name is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Unauthorized("missing bearer token".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::Forbidden("head only".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServiceError::NotFound("member".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Conflict("username taken".into()).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            ServiceError::NotFound("medication".into()).to_string(),
            "medication not found"
        );
    }
}
