//! Verify Code Use Case

use std::sync::Arc;
use uuid::Uuid;

use crate::application::config::OtpConfig;
use crate::domain::repository::{
    AccountDirectory, AttemptOutcome, ChallengeRepository, PendingRegistrationRepository,
};
use crate::domain::value_objects::{ChallengeKey, ChallengeKind};
use crate::error::{OtpError, OtpResult};

/// What a successful verification grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Register flow: the pending registration became a real account
    /// and a session was opened for it.
    Registered {
        account_id: Uuid,
        session_token: String,
    },
    /// Forgot-password flow: permission to set a new password. The
    /// code alone never grants a session for this kind.
    PasswordResetGranted,
}

/// Verify Code Use Case
pub struct VerifyCodeUseCase<C, P, A>
where
    C: ChallengeRepository,
    P: PendingRegistrationRepository,
    A: AccountDirectory,
{
    challenge_repo: Arc<C>,
    pending_repo: Arc<P>,
    directory: Arc<A>,
    config: Arc<OtpConfig>,
}

impl<C, P, A> VerifyCodeUseCase<C, P, A>
where
    C: ChallengeRepository,
    P: PendingRegistrationRepository,
    A: AccountDirectory,
{
    pub fn new(
        challenge_repo: Arc<C>,
        pending_repo: Arc<P>,
        directory: Arc<A>,
        config: Arc<OtpConfig>,
    ) -> Self {
        Self {
            challenge_repo,
            pending_repo,
            directory,
            config,
        }
    }

    pub async fn execute(
        &self,
        subject: &str,
        kind: ChallengeKind,
        submitted_code: &str,
    ) -> OtpResult<VerifyOutcome> {
        let key = ChallengeKey::new(subject, kind);

        // One atomic step: consume-on-match makes the challenge
        // single-use and closes the race with a concurrent resend (a
        // replaced code no longer matches anything), while a miss is
        // charged to the very challenge the comparison saw.
        let outcome = self
            .challenge_repo
            .verify_attempt(&key, submitted_code, self.config.max_attempts)
            .await?;

        let challenge = match outcome {
            AttemptOutcome::Consumed(challenge) => challenge,
            AttemptOutcome::Miss { attempts } if attempts >= self.config.max_attempts => {
                tracing::warn!(
                    kind = %kind,
                    attempts,
                    "Challenge invalidated after too many attempts"
                );
                return Err(OtpError::ChallengeExpired);
            }
            AttemptOutcome::Miss { .. } => return Err(OtpError::ChallengeMismatch),
            AttemptOutcome::Missing => return Err(OtpError::ChallengeNotFound),
        };

        // Consumed either way; an expired code forces a fresh issue.
        if challenge.is_expired(self.config.validity_window()) {
            tracing::warn!(kind = %kind, "Correct code submitted after expiry");
            return Err(OtpError::ChallengeExpired);
        }

        match kind {
            ChallengeKind::Register => self.promote_registration(&key.subject).await,
            ChallengeKind::ForgotPassword => {
                tracing::info!("Password reset granted");
                Ok(VerifyOutcome::PasswordResetGranted)
            }
        }
    }

    async fn promote_registration(&self, subject: &str) -> OtpResult<VerifyOutcome> {
        let registration = self
            .pending_repo
            .take_pending(subject)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Verified register challenge without pending registration");
                OtpError::ChallengeExpired
            })?;

        let account_id = self.directory.create_account(&registration).await?;
        let session_token = self.directory.open_session(account_id).await?;

        tracing::info!(account_id = %account_id, "Registration promoted to account");

        Ok(VerifyOutcome::Registered {
            account_id,
            session_token,
        })
    }
}
