//! Verify Token Use Case
//!
//! Wraps the remote authentication backend with the gateway's
//! fail-closed policy: absent/empty tokens never reach the backend,
//! and any backend error or timeout counts as invalid.

use std::sync::Arc;

use crate::application::config::GatewayConfig;
use crate::domain::repository::AuthBackend;

/// Collapsed verification outcome. There is no "unknown" state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    Valid { subject_id: String },
    Invalid,
}

impl TokenStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenStatus::Valid { .. })
    }
}

/// Verify token use case
pub struct VerifyTokenUseCase<B>
where
    B: AuthBackend,
{
    backend: Arc<B>,
    config: Arc<GatewayConfig>,
}

impl<B> VerifyTokenUseCase<B>
where
    B: AuthBackend,
{
    pub fn new(backend: Arc<B>, config: Arc<GatewayConfig>) -> Self {
        Self { backend, config }
    }

    /// Verify a token carried by the caller, if any.
    ///
    /// Exactly zero or one backend calls; no inline retries. The call
    /// is bounded by `config.verify_timeout`.
    pub async fn execute(&self, token: Option<&str>) -> TokenStatus {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return TokenStatus::Invalid;
        };

        let verification =
            tokio::time::timeout(self.config.verify_timeout, self.backend.verify_token(token))
                .await;

        match verification {
            Ok(Ok(v)) if v.valid => match v.subject_id {
                Some(subject_id) => TokenStatus::Valid { subject_id },
                // A valid flag without a subject is not trusted
                None => {
                    tracing::warn!("Backend reported valid token without subject");
                    TokenStatus::Invalid
                }
            },
            Ok(Ok(_)) => TokenStatus::Invalid,
            Ok(Err(e)) => {
                e.log();
                TokenStatus::Invalid
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.config.verify_timeout.as_millis() as u64,
                    "Token verification deadline exceeded"
                );
                TokenStatus::Invalid
            }
        }
    }
}
