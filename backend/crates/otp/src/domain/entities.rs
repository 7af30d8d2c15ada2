//! Domain Entities
//!
//! Core business entities for the OTP domain.

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{ChallengeKey, OtpCode};

/// An active one-time-code challenge.
///
/// At most one exists per [`ChallengeKey`] at any instant; issuing a
/// replacement invalidates the prior code.
#[derive(Debug, Clone)]
pub struct OtpChallenge {
    pub key: ChallengeKey,
    pub code: OtpCode,
    pub issued_at: DateTime<Utc>,
    pub resend_available_at: DateTime<Utc>,
    pub attempt_count: u32,
}

impl OtpChallenge {
    /// Create a fresh challenge with a zeroed attempt counter.
    ///
    /// The cooldown is applied at full precision; sub-second windows
    /// must still throttle.
    pub fn new(key: ChallengeKey, code: OtpCode, cooldown: chrono::Duration) -> Self {
        let now = Utc::now();
        Self {
            key,
            code,
            issued_at: now,
            resend_available_at: now + cooldown,
            attempt_count: 0,
        }
    }

    /// Whether the code is older than the validity window.
    pub fn is_expired(&self, validity: chrono::Duration) -> bool {
        Utc::now() > self.issued_at + validity
    }

    /// Whether the resend cooldown has elapsed.
    pub fn resend_available(&self) -> bool {
        Utc::now() >= self.resend_available_at
    }
}

/// A registration waiting for its OTP to be verified.
///
/// The password hash is opaque here: hashing happens in the
/// registration intake, before the workflow ever sees the record.
#[derive(Debug, Clone)]
pub struct PendingRegistration {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl PendingRegistration {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into().trim().to_lowercase(),
            name: name.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }
}
