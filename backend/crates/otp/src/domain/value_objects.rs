//! Domain Value Objects
//!
//! Immutable value types for the OTP domain.

use std::fmt;

/// The two flows a challenge can belong to.
///
/// A code issued for one kind never satisfies a verification for the
/// other; the kind is part of the challenge's primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChallengeKind {
    Register,
    ForgotPassword,
}

impl ChallengeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeKind::Register => "register",
            ChallengeKind::ForgotPassword => "forgot-password",
        }
    }

    /// Parse a wire string. Unknown values are `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "register" => Some(ChallengeKind::Register),
            "forgot-password" => Some(ChallengeKind::ForgotPassword),
            _ => None,
        }
    }
}

impl fmt::Display for ChallengeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary key of a challenge: (subject, kind).
///
/// The subject is normalized at construction so that "A@x.com " and
/// "a@x.com" address the same challenge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChallengeKey {
    pub subject: String,
    pub kind: ChallengeKind,
}

impl ChallengeKey {
    pub fn new(subject: &str, kind: ChallengeKind) -> Self {
        Self {
            subject: subject.trim().to_lowercase(),
            kind,
        }
    }
}

/// A fixed-length numeric one-time code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Constant-time comparison against a submitted code.
    pub fn matches(&self, submitted: &str) -> bool {
        platform::crypto::constant_time_eq(self.0.as_bytes(), submitted.as_bytes())
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
