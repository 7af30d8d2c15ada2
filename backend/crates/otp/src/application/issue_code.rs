//! Issue Code Use Case

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::application::config::OtpConfig;
use crate::domain::entities::{OtpChallenge, PendingRegistration};
use crate::domain::repository::{
    AccountDirectory, ChallengeRepository, CodeDelivery, PendingRegistrationRepository,
};
use crate::domain::services::generate_code;
use crate::domain::value_objects::{ChallengeKey, ChallengeKind};
use crate::error::{OtpError, OtpResult};

/// Output DTO for issue code
#[derive(Debug, Clone)]
pub struct IssueCodeOutput {
    pub resend_available_at: DateTime<Utc>,
}

/// Issue Code Use Case
pub struct IssueCodeUseCase<C, P, D, A>
where
    C: ChallengeRepository,
    P: PendingRegistrationRepository,
    D: CodeDelivery,
    A: AccountDirectory,
{
    challenge_repo: Arc<C>,
    pending_repo: Arc<P>,
    delivery: Arc<D>,
    directory: Arc<A>,
    config: Arc<OtpConfig>,
}

impl<C, P, D, A> IssueCodeUseCase<C, P, D, A>
where
    C: ChallengeRepository,
    P: PendingRegistrationRepository,
    D: CodeDelivery,
    A: AccountDirectory,
{
    pub fn new(
        challenge_repo: Arc<C>,
        pending_repo: Arc<P>,
        delivery: Arc<D>,
        directory: Arc<A>,
        config: Arc<OtpConfig>,
    ) -> Self {
        Self {
            challenge_repo,
            pending_repo,
            delivery,
            directory,
            config,
        }
    }

    /// Issue a code for (subject, kind).
    ///
    /// A register issue may carry the registration data; it is stored
    /// as the pending registration before the code goes out. Without
    /// it, a pending registration must already exist for the subject.
    pub async fn execute(
        &self,
        subject: &str,
        kind: ChallengeKind,
        registration: Option<PendingRegistration>,
    ) -> OtpResult<IssueCodeOutput> {
        let key = ChallengeKey::new(subject, kind);

        if let Some(registration) = registration {
            if kind != ChallengeKind::Register {
                return Err(OtpError::MissingField("type".to_string()));
            }
            self.pending_repo.put_pending(&registration).await?;
        }

        // A code is only issued for a subject the flow can complete:
        // register needs its pending registration, forgot-password an
        // existing account.
        let eligible = match kind {
            ChallengeKind::Register => {
                self.pending_repo.get_pending(&key.subject).await?.is_some()
            }
            ChallengeKind::ForgotPassword => self.directory.account_exists(&key.subject).await?,
        };
        if !eligible {
            tracing::warn!(kind = %kind, "Code requested for unknown subject");
            return Err(OtpError::ChallengeNotFound);
        }

        let code = generate_code(self.config.code_length);
        let challenge = OtpChallenge::new(key, code, self.config.resend_window());

        // Re-issue for an active pair is subject to the same cooldown
        // as a resend; otherwise calling issue again would bypass the
        // throttle and turn it into unlimited deliveries. Once the
        // cooldown has elapsed the replacement invalidates the
        // previous code.
        match self.challenge_repo.replace_after_cooldown(&challenge).await {
            Ok(()) => {}
            Err(OtpError::ChallengeNotFound) => self.challenge_repo.put(&challenge).await?,
            Err(e) => return Err(e),
        }

        deliver(
            self.delivery.as_ref(),
            &challenge.key.subject,
            challenge.code.as_str(),
            kind,
        )
        .await;

        tracing::info!(kind = %kind, "Code issued");

        Ok(IssueCodeOutput {
            resend_available_at: challenge.resend_available_at,
        })
    }
}

/// Hand a code to the delivery channel.
///
/// Delivery failure never rolls back the issue: the code stays valid
/// and a resend lets the caller retry.
pub(crate) async fn deliver<D>(delivery: &D, subject: &str, code: &str, kind: ChallengeKind)
where
    D: CodeDelivery,
{
    if let Err(e) = delivery.send(subject, code, kind).await {
        tracing::warn!(kind = %kind, error = %e, "Code delivery failed");
    }
}
