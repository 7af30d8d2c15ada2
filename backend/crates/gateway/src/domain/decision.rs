//! Gate Decisions
//!
//! The per-request outcome of the session gateway. The gateway emits
//! no side effects besides the optional redirect marker carried here;
//! in particular it never mutates the session token.

use crate::domain::route::AuthPage;

/// Terminal outcome for one screened request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Let the request through
    Allow,
    /// Restricted deployment, path outside the production allow-list
    RedirectToRoot,
    /// Missing or invalid session on a protected path
    RedirectToLogin,
    /// Authenticated caller on an auth-only page: send to the app and
    /// drop a short-lived marker naming the bypassed page
    RedirectToApp { bypassed: AuthPage },
}

impl GateDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, GateDecision::Allow)
    }
}
