//! OTP Workflow Module
//!
//! Clean Architecture structure:
//! - `domain/` - Challenges, pending registrations, repository traits
//! - `application/` - Use cases (issue, resend, verify)
//! - `infra/` - PostgreSQL and in-memory implementations
//! - `presentation/` - HTTP handlers
//!
//! ## Security Model
//! - Codes are short numeric secrets: single-use, bounded validity,
//!   and a failed-attempt cap that invalidates the challenge
//! - One active code per (subject, kind); issuing or resending
//!   replaces and invalidates the previous code atomically
//! - A register code mints a session only through account promotion;
//!   a forgot-password code grants a password reset, never a session
//! - Delivery is fire-and-forget: a failed send never rolls back an
//!   issued code

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::OtpConfig;
pub use application::issue_code::IssueCodeUseCase;
pub use application::resend_code::ResendCodeUseCase;
pub use application::verify_code::{VerifyCodeUseCase, VerifyOutcome};
pub use domain::entities::{OtpChallenge, PendingRegistration};
pub use domain::repository::{
    AccountDirectory, AttemptOutcome, ChallengeRepository, CodeDelivery,
    PendingRegistrationRepository,
};
pub use domain::value_objects::{ChallengeKey, ChallengeKind, OtpCode};
pub use error::{OtpError, OtpResult};
pub use infra::memory::MemoryOtpRepository;
pub use infra::postgres::PgOtpRepository;
pub use presentation::router::otp_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
