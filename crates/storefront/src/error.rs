//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures unexpected errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`.
//!
//! # Taxonomy
//!
//! Credential and input errors are detected locally, without contacting the
//! backend. Backend-reported errors pass through with their original status
//! and message. Only genuinely unexpected conditions (a malformed backend
//! response, an unreachable backend) produce a generic 500.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type for the storefront edge.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required input was missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// No credential was presented where one is required.
    #[error("{0}")]
    Unauthenticated(String),

    /// The storefront session credential failed verification. All
    /// verification failures (malformed, expired, bad signature) collapse
    /// into this one kind so cryptographic detail never reaches the client.
    #[error("Invalid or expired session")]
    InvalidSession,

    /// A valid session was presented without the backend credential. The
    /// session alone never implies standing authorization against the
    /// backend.
    #[error("Backend token is required")]
    MissingUpstreamCredential,

    /// The backend rejected or failed the request; status and message pass
    /// through unchanged.
    #[error("upstream error ({status}): {message}")]
    Upstream {
        /// The backend's own status code.
        status: StatusCode,
        /// The backend's own message.
        message: String,
    },

    /// The backend's response was missing an expected field.
    #[error("unexpected response from backend: {0}")]
    UpstreamContract(String),

    /// The backend was unreachable (DNS, connection refused, timeout).
    #[error("{0}")]
    Network(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The HTTP status this error is reported with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) | Self::InvalidSession | Self::MissingUpstreamCredential => {
                StatusCode::UNAUTHORIZED
            }
            Self::Upstream { status, .. } => *status,
            Self::UpstreamContract(_) | Self::Network(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture genuinely unexpected conditions to Sentry
        if matches!(
            self,
            Self::UpstreamContract(_) | Self::Network(_) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::UpstreamContract(_) => "Unexpected response from backend".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_local_error_status_codes() {
        assert_eq!(
            get_status(AppError::Validation("phone is required".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Unauthenticated(
                "Authorization header is required".to_string()
            )),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(get_status(AppError::InvalidSession), StatusCode::UNAUTHORIZED);
        assert_eq!(
            get_status(AppError::MissingUpstreamCredential),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_upstream_status_passes_through() {
        let err = AppError::Upstream {
            status: StatusCode::FORBIDDEN,
            message: "not allowed".to_string(),
        };
        assert_eq!(get_status(err), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_unexpected_conditions_are_500() {
        assert_eq!(
            get_status(AppError::UpstreamContract("login response had no user".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Network("failed to fetch orders".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_session_message_is_uniform() {
        // Expired, malformed, and bad-signature sessions all render the same.
        assert_eq!(AppError::InvalidSession.to_string(), "Invalid or expired session");
    }
}
