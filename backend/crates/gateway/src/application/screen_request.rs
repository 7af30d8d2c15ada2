//! Screen Request Use Case
//!
//! The per-request decision state machine. The order of checks is
//! security-relevant and must not be rearranged: Restricted-mode
//! override first, then the auth-page bypass, then the Public
//! short-circuit, then default-deny.

use std::sync::Arc;

use crate::application::config::GatewayConfig;
use crate::application::verify_token::{TokenStatus, VerifyTokenUseCase};
use crate::domain::decision::GateDecision;
use crate::domain::repository::AuthBackend;
use crate::domain::route::{RouteClass, RouteTable};

/// Screen request use case
pub struct ScreenRequestUseCase<B>
where
    B: AuthBackend,
{
    verifier: VerifyTokenUseCase<B>,
    routes: Arc<RouteTable>,
    config: Arc<GatewayConfig>,
}

impl<B> ScreenRequestUseCase<B>
where
    B: AuthBackend,
{
    pub fn new(backend: Arc<B>, routes: Arc<RouteTable>, config: Arc<GatewayConfig>) -> Self {
        Self {
            verifier: VerifyTokenUseCase::new(backend, config.clone()),
            routes,
            config,
        }
    }

    /// Decide one request. `is_read` is true for non-mutating requests
    /// (GET/HEAD). The token is verified at most once; the result is
    /// reused by the later checks.
    pub async fn execute(
        &self,
        path: &str,
        is_read: bool,
        token: Option<&str>,
    ) -> GateDecision {
        let class = self.routes.classify(path, self.config.deployment_mode);

        // Restricted-mode override is terminal, valid session or not.
        if class == RouteClass::OutsideProduction {
            tracing::debug!(path, "Outside production allow-list");
            return GateDecision::RedirectToRoot;
        }

        // Lazily verified, at most once per request.
        let mut status: Option<TokenStatus> = None;

        // Authenticated callers reading an auth-only page get bounced
        // to the app instead of re-seeing login/register forms.
        if let RouteClass::AuthOnly(page) = class {
            if is_read {
                let s = self.verifier.execute(token).await;
                if s.is_valid() {
                    tracing::debug!(path, page = page.as_str(), "Auth page bypass");
                    return GateDecision::RedirectToApp { bypassed: page };
                }
                status = Some(s);
            }
        }

        // Public pages render regardless of token validity, including
        // when the verifier is down. No verification is performed.
        if class == RouteClass::Public {
            return GateDecision::Allow;
        }

        // Default-deny: Protected, or AuthOnly not caught above.
        let status = match status {
            Some(s) => s,
            None => self.verifier.execute(token).await,
        };

        if status.is_valid() {
            GateDecision::Allow
        } else {
            tracing::debug!(path, "Unauthenticated request on protected path");
            GateDecision::RedirectToLogin
        }
    }
}
