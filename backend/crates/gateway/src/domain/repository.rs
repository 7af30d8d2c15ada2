//! Backend Seam
//!
//! Interface to the external authentication service. The transport
//! behind it (RPC, HTTP, in-process) is a collaborator concern.

use crate::error::GatewayResult;

/// Verification result reported by the authentication service.
///
/// Treated as untrusted until this struct says otherwise; a `valid`
/// flag without a subject is still rejected by the use case.
#[derive(Debug, Clone)]
pub struct TokenVerification {
    pub valid: bool,
    pub subject_id: Option<String>,
}

impl TokenVerification {
    pub fn valid(subject_id: impl Into<String>) -> Self {
        Self {
            valid: true,
            subject_id: Some(subject_id.into()),
        }
    }

    pub fn invalid() -> Self {
        Self {
            valid: false,
            subject_id: None,
        }
    }
}

/// Authentication backend trait
///
/// One blocking, fallible remote call per request at most. Retries, if
/// any, belong to the transport implementation, never to the gateway.
#[trait_variant::make(AuthBackend: Send)]
pub trait LocalAuthBackend {
    /// Validate an opaque session token
    async fn verify_token(&self, token: &str) -> GatewayResult<TokenVerification>;
}
