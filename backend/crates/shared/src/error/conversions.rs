//! Conversions into [`AppError`] from foreign error types.
//!
//! The gateway and the OTP workflow fold every upstream failure into
//! an [`AppError`] before it can reach a caller; these impls cover the
//! error types that cross crate boundaries on that path.

use super::app_error::AppError;
use super::kind::ErrorKind;

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::Forbidden,
            std::io::ErrorKind::TimedOut => ErrorKind::RequestTimeout,
            _ => ErrorKind::InternalServerError,
        };
        AppError::new(kind, "I/O failure").with_source(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        // Syntax and data errors come from the caller's payload;
        // anything else is our own serialization going wrong.
        let kind = if err.is_syntax() || err.is_data() {
            ErrorKind::BadRequest
        } else {
            ErrorKind::InternalServerError
        };
        AppError::new(kind, format!("JSON error: {err}")).with_source(err)
    }
}

/// Map a PostgreSQL error class to an [`ErrorKind`].
///
/// Codes: https://www.postgresql.org/docs/current/errcodes-appendix.html
#[cfg(feature = "sqlx")]
fn pg_code_kind(code: &str) -> ErrorKind {
    match code {
        // 23xxx: integrity constraint violations. Unique and foreign
        // key violations surface as conflicts with current state.
        "23502" => ErrorKind::BadRequest,
        "23503" | "23505" => ErrorKind::Conflict,
        // 53xxx (insufficient resources) and 57xxx (operator
        // intervention, including shutdown and statement cancel) both
        // mean the database cannot serve us right now.
        c if c.starts_with("53") || c.starts_with("57") => ErrorKind::ServiceUnavailable,
        _ => ErrorKind::InternalServerError,
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let folded = match &err {
            sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                AppError::service_unavailable("Database unreachable")
            }
            sqlx::Error::Database(db_err) => match db_err.code() {
                Some(code) => AppError::new(pg_code_kind(code.as_ref()), "Database rejected query"),
                None => AppError::internal("Database error"),
            },
            _ => AppError::internal("Database error"),
        };
        folded.with_source(err)
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 problem details; `action` is omitted when absent.
        let mut body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
        });
        if let Some(action) = self.action() {
            body["action"] = serde_json::Value::String(action.to_string());
        }

        (status, Json(body)).into_response()
    }
}
