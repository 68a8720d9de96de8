//! HTTP mapping for `KennelError`.
//!
//! | Error | Status | `error` code |
//! |-------|--------|--------------|
//! | Validation | 400 | `validation_error` |
//! | Unauthorized | 401 | `unauthorized` |
//! | WaitlistClosed | 403 | `waitlist_closed` |
//! | NotFound | 404 | `not_found` |
//! | DuplicateEntry | 409 | `duplicate_entry` |
//! | Conflict | 409 | `conflict` |
//! | CascadeFailure | 500 | `cascade_failure` |
//! | Storage / Internal | 500 | `internal_error` |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::ErrorResponse;
use tracing::{error, warn};

use crate::domain::KennelError;

impl KennelError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            KennelError::Validation { .. } => StatusCode::BAD_REQUEST,
            KennelError::Unauthorized => StatusCode::UNAUTHORIZED,
            KennelError::WaitlistClosed => StatusCode::FORBIDDEN,
            KennelError::NotFound { .. } => StatusCode::NOT_FOUND,
            KennelError::DuplicateEntry { .. } | KennelError::Conflict(_) => StatusCode::CONFLICT,
            KennelError::CascadeFailure { .. }
            | KennelError::Storage(_)
            | KennelError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            KennelError::Validation { .. } => "validation_error",
            KennelError::Unauthorized => "unauthorized",
            KennelError::WaitlistClosed => "waitlist_closed",
            KennelError::NotFound { .. } => "not_found",
            KennelError::DuplicateEntry { .. } => "duplicate_entry",
            KennelError::Conflict(_) => "conflict",
            KennelError::CascadeFailure { .. } => "cascade_failure",
            KennelError::Storage(_) | KennelError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for KennelError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let message = match &self {
            KennelError::Storage(e) => {
                error!(target: "database", error = %e, "Database error occurred");
                "Internal server error".to_string()
            }
            KennelError::Internal(e) => {
                error!(error = %e, "Internal error occurred");
                "Internal server error".to_string()
            }
            other => {
                if status.is_server_error() {
                    error!("{}", other);
                } else {
                    warn!("{}", other);
                }
                other.to_string()
            }
        };

        let (missing_fields, unreleased_images) = match self {
            KennelError::Validation { missing, .. } => (missing, Vec::new()),
            KennelError::CascadeFailure { unreleased, .. } => (Vec::new(), unreleased),
            _ => (Vec::new(), Vec::new()),
        };

        let body = ErrorResponse {
            error: code.to_string(),
            message,
            missing_fields,
            unreleased_images,
        };
        (status, Json(body)).into_response()
    }
}
