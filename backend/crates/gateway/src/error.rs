//! Gateway Error Types
//!
//! This module provides gateway-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.
//!
//! The gateway itself never surfaces these to a caller: every failure
//! collapses into a redirect decision. They exist for the backend seam
//! and for logging.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Gateway-specific result type alias
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway-specific error variants
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Authentication backend unreachable or failing
    #[error("Authentication backend unavailable: {0}")]
    Upstream(String),

    /// Verification call exceeded its deadline
    #[error("Token verification timed out")]
    VerifyTimeout,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Upstream(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::VerifyTimeout => StatusCode::REQUEST_TIMEOUT,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Upstream(_) => ErrorKind::ServiceUnavailable,
            GatewayError::VerifyTimeout => ErrorKind::RequestTimeout,
            GatewayError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            GatewayError::Upstream(msg) => {
                tracing::warn!(message = %msg, "Authentication backend unavailable");
            }
            GatewayError::VerifyTimeout => {
                tracing::warn!("Token verification timed out");
            }
            GatewayError::Internal(msg) => {
                tracing::error!(message = %msg, "Gateway internal error");
            }
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        AppError::new(err.kind(), err.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        // Empty body: backend details never leak to the caller
        (status, ()).into_response()
    }
}
