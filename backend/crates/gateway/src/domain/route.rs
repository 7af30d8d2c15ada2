//! Route Classification
//!
//! Pure mapping from request path (and deployment mode) to a route
//! class. No I/O, no clock: trivially unit-testable.

use std::collections::{HashMap, HashSet};

/// Deployment mode of the whole installation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentMode {
    /// Normal operation: every route serves its own category
    #[default]
    Standard,
    /// Hardened rollout: only the production allow-list is reachable,
    /// everything else redirects to root
    Restricted,
}

/// Unauthenticated entry pages (login/registration surfaces).
///
/// An authenticated caller landing on one of these gets bounced to the
/// app; the variant names which page was bypassed so the UI can show a
/// one-time message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPage {
    Login,
    Register,
    ForgotPassword,
    VerifyCode,
}

impl AuthPage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthPage::Login => "login",
            AuthPage::Register => "register",
            AuthPage::ForgotPassword => "forgot-password",
            AuthPage::VerifyCode => "verify",
        }
    }
}

/// Outcome of classifying a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Always reachable, no verification performed
    Public,
    /// Login/registration surface, hidden from authenticated callers
    AuthOnly(AuthPage),
    /// Default: requires a valid session
    Protected,
    /// Restricted mode only: path is outside the production allow-list
    OutsideProduction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Public,
    AuthOnly(AuthPage),
}

/// Immutable path -> class table, built once at startup and shared
/// read-only across all request handling.
///
/// Matching is exact-path, never prefix-based: listing `/profile` as
/// public must not implicitly expose `/profile/account`.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: HashMap<&'static str, Entry>,
    production_only: HashSet<&'static str>,
}

impl RouteTable {
    /// Empty table: every path classifies as Protected.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            production_only: HashSet::new(),
        }
    }

    /// The standard table for this application.
    pub fn with_defaults() -> Self {
        Self::new()
            .public("/")
            .public("/about")
            .public("/privacy")
            .public("/terms")
            .public("/waitlist")
            .auth_only("/login", AuthPage::Login)
            .auth_only("/register", AuthPage::Register)
            .auth_only("/forgot-password", AuthPage::ForgotPassword)
            .auth_only("/verify", AuthPage::VerifyCode)
            .production_only("/")
            .production_only("/waitlist")
            .production_only("/privacy")
            .production_only("/terms")
    }

    pub fn public(mut self, path: &'static str) -> Self {
        self.entries.insert(path, Entry::Public);
        self
    }

    pub fn auth_only(mut self, path: &'static str, page: AuthPage) -> Self {
        self.entries.insert(path, Entry::AuthOnly(page));
        self
    }

    /// Mark a path as reachable in Restricted mode. The path must also
    /// carry a normal category (usually Public) for Standard mode.
    pub fn production_only(mut self, path: &'static str) -> Self {
        self.production_only.insert(path);
        self
    }

    /// Classify a path. The Restricted-mode override is evaluated
    /// before the normal lookup and short-circuits it.
    pub fn classify(&self, path: &str, mode: DeploymentMode) -> RouteClass {
        if mode == DeploymentMode::Restricted && !self.production_only.contains(path) {
            return RouteClass::OutsideProduction;
        }

        match self.entries.get(path) {
            Some(Entry::Public) => RouteClass::Public,
            Some(Entry::AuthOnly(page)) => RouteClass::AuthOnly(*page),
            None => RouteClass::Protected,
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}
