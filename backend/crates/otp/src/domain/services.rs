//! Domain Services
//!
//! Code generation for the OTP domain.

use crate::domain::value_objects::OtpCode;

/// Generate a numeric one-time code of the given length.
///
/// Digits come from the platform CSPRNG with modulo-bias rejection, so
/// every code of a given length is equally likely.
pub fn generate_code(length: usize) -> OtpCode {
    OtpCode::new(platform::crypto::random_digits(length))
}
