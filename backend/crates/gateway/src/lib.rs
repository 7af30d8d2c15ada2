//! Session Gateway Module
//!
//! Clean Architecture structure:
//! - `domain/` - Route table, decisions, backend trait
//! - `application/` - Use cases (token verification, request screening)
//! - `presentation/` - Axum middleware
//!
//! ## Security Model
//! - Token verification is fail-closed: an unverifiable caller is an
//!   unauthenticated caller (backend errors and timeouts included)
//! - Public paths are served without any verification, so public pages
//!   stay up when the authentication backend is down
//! - Route matching is exact-path: a public `/profile` does not expose
//!   `/profile/account`
//! - In Restricted deployments everything outside the production
//!   allow-list redirects to root, valid session or not

pub mod application;
pub mod domain;
pub mod error;
pub mod presentation;

// Re-exports for convenience
pub use application::config::GatewayConfig;
pub use application::screen_request::ScreenRequestUseCase;
pub use application::verify_token::{TokenStatus, VerifyTokenUseCase};
pub use domain::decision::GateDecision;
pub use domain::repository::{AuthBackend, TokenVerification};
pub use domain::route::{AuthPage, DeploymentMode, RouteClass, RouteTable};
pub use error::{GatewayError, GatewayResult};
pub use presentation::middleware::{GatewayState, screen};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
