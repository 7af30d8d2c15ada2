//! OTP Error Types
//!
//! This module provides OTP-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// OTP-specific result type alias
pub type OtpResult<T> = Result<T, OtpError>;

/// OTP-specific error variants
///
/// Unlike the gateway, the OTP surface reports its error kind verbatim
/// so the caller can render an accurate message ("wrong code" vs "too
/// many attempts" vs "wait before resending").
#[derive(Debug, Error)]
pub enum OtpError {
    /// Malformed request: a required field is missing or empty
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Resend attempted before the cooldown elapsed
    #[error("Resend cooldown has not elapsed")]
    Throttled,

    /// No active challenge for this (subject, type) pair
    #[error("Challenge not found")]
    ChallengeNotFound,

    /// Submitted code does not match the active challenge
    #[error("Code mismatch")]
    ChallengeMismatch,

    /// Challenge expired, either by age or by exhausting attempts
    #[error("Challenge expired")]
    ChallengeExpired,

    /// Account already exists for this subject
    #[error("Account already exists")]
    DuplicateAccount,

    /// Directory/delivery collaborator call failed
    #[error("Upstream unavailable: {0}")]
    Upstream(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OtpError {
    /// Machine-readable wire code for the caller UI
    pub fn code(&self) -> &'static str {
        match self {
            OtpError::MissingField(_) => "missing-field",
            OtpError::Throttled => "throttled",
            OtpError::ChallengeNotFound => "not-found",
            OtpError::ChallengeMismatch => "mismatch",
            OtpError::ChallengeExpired => "expired",
            OtpError::DuplicateAccount => "conflict",
            OtpError::Upstream(_) => "upstream",
            OtpError::Database(_) | OtpError::Internal(_) => "internal",
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            OtpError::MissingField(_) => StatusCode::BAD_REQUEST,
            OtpError::Throttled => StatusCode::TOO_MANY_REQUESTS,
            OtpError::ChallengeNotFound => StatusCode::NOT_FOUND,
            OtpError::ChallengeMismatch => StatusCode::CONFLICT,
            OtpError::ChallengeExpired => StatusCode::GONE,
            OtpError::DuplicateAccount => StatusCode::CONFLICT,
            OtpError::Upstream(_) => StatusCode::SERVICE_UNAVAILABLE,
            OtpError::Database(_) | OtpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            OtpError::MissingField(_) => ErrorKind::BadRequest,
            OtpError::Throttled => ErrorKind::TooManyRequests,
            OtpError::ChallengeNotFound => ErrorKind::NotFound,
            OtpError::ChallengeMismatch => ErrorKind::Conflict,
            OtpError::ChallengeExpired => ErrorKind::Gone,
            OtpError::DuplicateAccount => ErrorKind::Conflict,
            OtpError::Upstream(_) => ErrorKind::ServiceUnavailable,
            OtpError::Database(_) | OtpError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            OtpError::Database(e) => {
                tracing::error!(error = %e, "OTP database error");
            }
            OtpError::Internal(msg) => {
                tracing::error!(message = %msg, "OTP internal error");
            }
            OtpError::Upstream(msg) => {
                tracing::error!(message = %msg, "OTP upstream unavailable");
            }
            OtpError::ChallengeMismatch => {
                tracing::warn!("OTP code mismatch");
            }
            OtpError::Throttled => {
                tracing::warn!("OTP resend throttled");
            }
            _ => {
                tracing::debug!(error = %self, "OTP error");
            }
        }
    }
}

impl From<OtpError> for AppError {
    fn from(err: OtpError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        AppError::new(kind, message)
    }
}

impl IntoResponse for OtpError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        // Wire code only; upstream/database details never leak out
        let body = serde_json::json!({ "error": self.code() });
        (status, Json(body)).into_response()
    }
}
