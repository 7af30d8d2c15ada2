//! Application Configuration
//!
//! Configuration for the OTP application layer.

use std::time::Duration;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// OTP application configuration
#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// Number of digits in a code
    pub code_length: usize,
    /// Minimum wait between resends for one (subject, kind)
    pub resend_cooldown: Duration,
    /// How long an issued code stays verifiable
    pub code_validity: Duration,
    /// Failed attempts that invalidate a challenge
    pub max_attempts: u32,
    /// How long an unverified registration is kept
    pub pending_registration_ttl: Duration,
    /// Cookie carrying the session token minted on registration
    pub session_cookie_name: String,
    /// Session cookie lifetime
    pub session_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            resend_cooldown: Duration::from_secs(30),
            code_validity: Duration::from_secs(600),
            max_attempts: 5,
            pending_registration_ttl: Duration::from_secs(3600),
            session_cookie_name: "auth_session".to_string(),
            session_ttl: Duration::from_secs(86400),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
        }
    }
}

impl OtpConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Default::default()
        }
    }

    /// Resend cooldown at millisecond precision. `as_secs` would floor
    /// sub-second cooldowns to zero and disable throttling.
    pub fn resend_window(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.resend_cooldown.as_millis() as i64)
    }

    /// Code validity window at millisecond precision.
    pub fn validity_window(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.code_validity.as_millis() as i64)
    }

    /// Retention window for unverified registrations.
    pub fn pending_ttl_window(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.pending_registration_ttl.as_millis() as i64)
    }

    /// Session cookie Max-Age; whole seconds per the cookie grammar.
    pub fn session_ttl_secs(&self) -> i64 {
        self.session_ttl.as_secs() as i64
    }
}
