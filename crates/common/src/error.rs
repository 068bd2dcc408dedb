//! Error types for clipcommerce.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Submission not found: {0}")]
    SubmissionNotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A workflow action was attempted on a submission that is not in the
    /// required source state. Retrying an already-applied action reports
    /// this error rather than silently succeeding.
    #[error("Invalid state transition: cannot {action} a {from} submission")]
    InvalidStateTransition {
        /// Current submission status.
        from: String,
        /// Attempted action.
        action: String,
    },

    /// The clipper has no payout destination configured.
    #[error("No payout account configured; connect a payout account before requesting payment")]
    MissingPayoutAccount,

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    /// An external provider (payment gateway, video metadata) errored or
    /// timed out. Retryable by the caller.
    #[error("Dependency failure: {0}")]
    Dependency(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_) | Self::SubmissionNotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) | Self::Validation(_) | Self::MissingPayoutAccount => {
                StatusCode::BAD_REQUEST
            }
            Self::Conflict(_) | Self::InvalidStateTransition { .. } => StatusCode::CONFLICT,

            // 5xx Server Errors
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Dependency(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::SubmissionNotFound(_) => "SUBMISSION_NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
            Self::MissingPayoutAccount => "MISSING_PAYOUT_ACCOUNT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Dependency(_) => "DEPENDENCY_FAILURE",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Returns whether the caller may retry the failed operation as-is.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Dependency(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log server errors
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_transition_is_conflict() {
        let err = AppError::InvalidStateTransition {
            from: "approved".to_string(),
            action: "approve".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "INVALID_STATE_TRANSITION");
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_dependency_failure_is_retryable() {
        let err = AppError::Dependency("transfer timed out".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert!(err.is_retryable());
        assert!(err.is_server_error());
    }

    #[test]
    fn test_missing_payout_account_is_client_error() {
        let err = AppError::MissingPayoutAccount;
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(!err.is_retryable());
    }
}
