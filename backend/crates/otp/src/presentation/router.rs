//! OTP Router

use axum::{Router, routing::post};
use std::sync::Arc;

use crate::application::config::OtpConfig;
use crate::domain::repository::{
    AccountDirectory, ChallengeRepository, CodeDelivery, PendingRegistrationRepository,
};
use crate::presentation::handlers::{self, OtpAppState};

/// Create the OTP router for any repository/collaborator combination
pub fn otp_router<R, D, A>(repo: R, delivery: D, directory: A, config: OtpConfig) -> Router
where
    R: ChallengeRepository + PendingRegistrationRepository + Clone + Send + Sync + 'static,
    D: CodeDelivery + Clone + Send + Sync + 'static,
    A: AccountDirectory + Clone + Send + Sync + 'static,
{
    let state = OtpAppState {
        repo: Arc::new(repo),
        delivery: Arc::new(delivery),
        directory: Arc::new(directory),
        config: Arc::new(config),
    };

    Router::new()
        .route("/issue", post(handlers::issue_code::<R, D, A>))
        .route("/resend", post(handlers::resend_code::<R, D, A>))
        .route("/verify", post(handlers::verify_code::<R, D, A>))
        .with_state(state)
}
