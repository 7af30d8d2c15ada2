//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use platform::cookie::{self, CookieConfig};
use std::sync::Arc;

use crate::application::config::OtpConfig;
use crate::application::issue_code::IssueCodeUseCase;
use crate::application::resend_code::ResendCodeUseCase;
use crate::application::verify_code::{VerifyCodeUseCase, VerifyOutcome};
use crate::domain::entities::PendingRegistration;
use crate::domain::repository::{
    AccountDirectory, ChallengeRepository, CodeDelivery, PendingRegistrationRepository,
};
use crate::domain::value_objects::ChallengeKind;
use crate::error::{OtpError, OtpResult};
use crate::presentation::dto::{CodeRequest, CodeResponse, VerifyRequest, VerifyResponse};

/// Shared state for OTP handlers
#[derive(Clone)]
pub struct OtpAppState<R, D, A>
where
    R: ChallengeRepository + PendingRegistrationRepository + Clone + Send + Sync + 'static,
    D: CodeDelivery + Clone + Send + Sync + 'static,
    A: AccountDirectory + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub delivery: Arc<D>,
    pub directory: Arc<A>,
    pub config: Arc<OtpConfig>,
}

/// POST /api/otp/issue
pub async fn issue_code<R, D, A>(
    State(state): State<OtpAppState<R, D, A>>,
    Json(req): Json<CodeRequest>,
) -> OtpResult<Json<CodeResponse>>
where
    R: ChallengeRepository + PendingRegistrationRepository + Clone + Send + Sync + 'static,
    D: CodeDelivery + Clone + Send + Sync + 'static,
    A: AccountDirectory + Clone + Send + Sync + 'static,
{
    let email = require_email(&req.email)?;
    let kind = parse_kind(&req.kind)?;
    let registration = registration_payload(&email, kind, &req)?;

    let use_case = IssueCodeUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.delivery.clone(),
        state.directory.clone(),
        state.config.clone(),
    );

    let output = use_case.execute(&email, kind, registration).await?;

    Ok(Json(CodeResponse {
        status: "sent",
        resend_available_at_ms: output.resend_available_at.timestamp_millis(),
    }))
}

/// POST /api/otp/resend
pub async fn resend_code<R, D, A>(
    State(state): State<OtpAppState<R, D, A>>,
    Json(req): Json<CodeRequest>,
) -> OtpResult<Json<CodeResponse>>
where
    R: ChallengeRepository + PendingRegistrationRepository + Clone + Send + Sync + 'static,
    D: CodeDelivery + Clone + Send + Sync + 'static,
    A: AccountDirectory + Clone + Send + Sync + 'static,
{
    let email = require_email(&req.email)?;
    let kind = parse_kind(&req.kind)?;

    let use_case = ResendCodeUseCase::new(
        state.repo.clone(),
        state.delivery.clone(),
        state.config.clone(),
    );

    let output = use_case.execute(&email, kind).await?;

    Ok(Json(CodeResponse {
        status: "sent",
        resend_available_at_ms: output.resend_available_at.timestamp_millis(),
    }))
}

/// POST /api/otp/verify
pub async fn verify_code<R, D, A>(
    State(state): State<OtpAppState<R, D, A>>,
    Json(req): Json<VerifyRequest>,
) -> OtpResult<Response>
where
    R: ChallengeRepository + PendingRegistrationRepository + Clone + Send + Sync + 'static,
    D: CodeDelivery + Clone + Send + Sync + 'static,
    A: AccountDirectory + Clone + Send + Sync + 'static,
{
    let email = require_email(&req.email)?;
    let kind = parse_kind(&req.kind)?;
    let code = require("code", &req.code)?;

    let use_case = VerifyCodeUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.directory.clone(),
        state.config.clone(),
    );

    let outcome = use_case.execute(&email, kind, &code).await?;

    let response = match outcome {
        VerifyOutcome::Registered { session_token, .. } => {
            let cookie = session_cookie(&state.config);
            let set_cookie = cookie::set_cookie_header(&cookie, &session_token);

            let mut response = Json(VerifyResponse {
                status: "success",
                outcome: "registered",
                token: Some(session_token),
            })
            .into_response();
            response.headers_mut().insert(header::SET_COOKIE, set_cookie);
            response
        }
        VerifyOutcome::PasswordResetGranted => Json(VerifyResponse {
            status: "success",
            outcome: "password-reset",
            token: None,
        })
        .into_response(),
    };

    Ok(response)
}

fn session_cookie(config: &OtpConfig) -> CookieConfig {
    CookieConfig {
        name: config.session_cookie_name.clone(),
        secure: config.cookie_secure,
        http_only: true,
        same_site: config.cookie_same_site,
        path: "/".to_string(),
        max_age_secs: Some(config.session_ttl_secs()),
    }
}

fn require(field: &str, value: &str) -> OtpResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(OtpError::MissingField(field.to_string()));
    }
    Ok(trimmed.to_string())
}

fn require_email(value: &str) -> OtpResult<String> {
    let email = require("email", value)?;
    if email.len() > 254 || !email.contains('@') {
        return Err(OtpError::MissingField("email".to_string()));
    }
    Ok(email)
}

/// Assemble the pending registration from a register issue request,
/// if the request carries one.
fn registration_payload(
    email: &str,
    kind: ChallengeKind,
    req: &CodeRequest,
) -> OtpResult<Option<PendingRegistration>> {
    if kind != ChallengeKind::Register {
        return Ok(None);
    }
    let (Some(name), Some(password_hash)) = (&req.name, &req.password_hash) else {
        return Ok(None);
    };

    let name = require("name", name)?;
    let password_hash = require("passwordHash", password_hash)?;
    Ok(Some(PendingRegistration::new(email, name, password_hash)))
}

fn parse_kind(raw: &str) -> OtpResult<ChallengeKind> {
    ChallengeKind::parse(raw.trim()).ok_or_else(|| OtpError::MissingField("type".to_string()))
}
