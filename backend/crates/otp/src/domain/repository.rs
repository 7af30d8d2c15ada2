//! Repository and Collaborator Traits
//!
//! Interfaces for challenge/registration persistence and for the
//! external collaborators the workflow drives. Implementations live in
//! the infrastructure layer (or in the composition root for the
//! directory and delivery seams).

use uuid::Uuid;

use crate::domain::entities::{OtpChallenge, PendingRegistration};
use crate::domain::value_objects::{ChallengeKey, ChallengeKind};
use crate::error::OtpResult;

/// Result of one atomic verification attempt against the store.
#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    /// The stored code matched; the challenge was removed and is
    /// returned for the expiry check.
    Consumed(OtpChallenge),
    /// The code differed; the attempt counter was charged against the
    /// same challenge the comparison saw. A count reaching the cap
    /// deletes the challenge.
    Miss { attempts: u32 },
    /// No active challenge for the key; covers both "never issued"
    /// and "already consumed".
    Missing,
}

/// Challenge repository trait.
///
/// Every operation is atomic with respect to its key, which is what
/// serializes concurrent Issue/Resend/Verify calls for the same
/// (subject, kind) pair. Different keys never contend.
#[trait_variant::make(ChallengeRepository: Send)]
pub trait LocalChallengeRepository {
    /// Store a challenge, replacing any active one for the same key.
    /// The replaced code is invalidated by the replacement.
    async fn put(&self, challenge: &OtpChallenge) -> OtpResult<()>;

    /// Replace the active challenge only if its resend cooldown has
    /// elapsed. Fails with `Throttled` inside the cooldown and with
    /// `ChallengeNotFound` when no challenge exists for the key.
    async fn replace_after_cooldown(&self, challenge: &OtpChallenge) -> OtpResult<()>;

    /// Run one verification attempt as a single atomic step: consume
    /// the challenge on a code match, otherwise charge the miss to the
    /// challenge the comparison saw. Splitting the two would let a
    /// concurrent replacement absorb an attempt meant for its
    /// predecessor.
    async fn verify_attempt(
        &self,
        key: &ChallengeKey,
        submitted: &str,
        max_attempts: u32,
    ) -> OtpResult<AttemptOutcome>;
}

/// Pending registration repository trait
#[trait_variant::make(PendingRegistrationRepository: Send)]
pub trait LocalPendingRegistrationRepository {
    /// Store a pending registration, replacing any existing one for
    /// the same email.
    async fn put_pending(&self, registration: &PendingRegistration) -> OtpResult<()>;

    /// Look up a pending registration by email.
    async fn get_pending(&self, email: &str) -> OtpResult<Option<PendingRegistration>>;

    /// Atomically remove and return a pending registration.
    async fn take_pending(&self, email: &str) -> OtpResult<Option<PendingRegistration>>;
}

/// Delivery channel for issued codes (email/SMS behind it).
///
/// Fire-and-forget: a delivery failure is reported but must not roll
/// back the issue, since the code stays valid for a later resend.
#[trait_variant::make(CodeDelivery: Send)]
pub trait LocalCodeDelivery {
    async fn send(&self, subject: &str, code: &str, kind: ChallengeKind) -> OtpResult<()>;
}

/// Account directory seam.
///
/// Owns accounts and session issuance; the workflow only drives it on
/// a successful register verification.
#[trait_variant::make(AccountDirectory: Send)]
pub trait LocalAccountDirectory {
    /// Whether an account exists for this email.
    async fn account_exists(&self, email: &str) -> OtpResult<bool>;

    /// Promote a verified registration into a real account. A
    /// pre-existing account surfaces as `DuplicateAccount`.
    async fn create_account(&self, registration: &PendingRegistration) -> OtpResult<Uuid>;

    /// Open a session for an account and return its opaque token.
    async fn open_session(&self, account_id: Uuid) -> OtpResult<String>;
}
