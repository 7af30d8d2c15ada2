//! Resend Code Use Case

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::application::config::OtpConfig;
use crate::application::issue_code::deliver;
use crate::domain::entities::OtpChallenge;
use crate::domain::repository::{ChallengeRepository, CodeDelivery};
use crate::domain::services::generate_code;
use crate::domain::value_objects::{ChallengeKey, ChallengeKind};
use crate::error::OtpResult;

/// Output DTO for resend code
#[derive(Debug, Clone)]
pub struct ResendCodeOutput {
    pub resend_available_at: DateTime<Utc>,
}

/// Resend Code Use Case
///
/// A successful resend behaves like a re-issue: new code, fresh
/// cooldown, zeroed attempt counter. It never counts as a verification
/// attempt.
pub struct ResendCodeUseCase<C, D>
where
    C: ChallengeRepository,
    D: CodeDelivery,
{
    challenge_repo: Arc<C>,
    delivery: Arc<D>,
    config: Arc<OtpConfig>,
}

impl<C, D> ResendCodeUseCase<C, D>
where
    C: ChallengeRepository,
    D: CodeDelivery,
{
    pub fn new(challenge_repo: Arc<C>, delivery: Arc<D>, config: Arc<OtpConfig>) -> Self {
        Self {
            challenge_repo,
            delivery,
            config,
        }
    }

    pub async fn execute(&self, subject: &str, kind: ChallengeKind) -> OtpResult<ResendCodeOutput> {
        let key = ChallengeKey::new(subject, kind);

        let code = generate_code(self.config.code_length);
        let challenge = OtpChallenge::new(key, code, self.config.resend_window());

        // Atomic check-and-replace: fails Throttled inside the
        // cooldown, ChallengeNotFound when nothing was ever issued.
        self.challenge_repo.replace_after_cooldown(&challenge).await?;

        deliver(
            self.delivery.as_ref(),
            &challenge.key.subject,
            challenge.code.as_str(),
            kind,
        )
        .await;

        tracing::info!(kind = %kind, "Code resent");

        Ok(ResendCodeOutput {
            resend_available_at: challenge.resend_available_at,
        })
    }
}
