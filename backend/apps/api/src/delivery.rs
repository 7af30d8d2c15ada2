//! Code Delivery Stand-In
//!
//! The real email/SMS channel lives behind its own service. This
//! implementation writes the code to the log so local flows can be
//! completed end to end without that service running.

use otp::{ChallengeKind, CodeDelivery, OtpResult};

#[derive(Clone, Default)]
pub struct LogCodeDelivery;

impl CodeDelivery for LogCodeDelivery {
    async fn send(&self, subject: &str, code: &str, kind: ChallengeKind) -> OtpResult<()> {
        tracing::info!(subject, code, kind = %kind, "One-time code (log delivery)");
        Ok(())
    }
}
