//! Application Configuration
//!
//! Configuration for the gateway application layer.

use std::time::Duration;

use crate::domain::route::DeploymentMode;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Gateway application configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Deployment mode (Restricted enables the production allow-list)
    pub deployment_mode: DeploymentMode,
    /// Cookie carrying the session token
    pub session_cookie_name: String,
    /// Cookie carrying the redirect marker
    pub marker_cookie_name: String,
    /// Redirect marker lifetime (seconds-scale by design)
    pub marker_ttl: Duration,
    /// Deadline for the remote verification call
    pub verify_timeout: Duration,
    /// Redirect target for Restricted-mode rejections
    pub root_path: String,
    /// Redirect target for unauthenticated callers
    pub login_path: String,
    /// Authenticated landing page
    pub app_home_path: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            deployment_mode: DeploymentMode::Standard,
            session_cookie_name: "auth_session".to_string(),
            marker_cookie_name: "redirected-from".to_string(),
            marker_ttl: Duration::from_secs(5),
            verify_timeout: Duration::from_secs(3),
            root_path: "/".to_string(),
            login_path: "/login".to_string(),
            app_home_path: "/chat".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
        }
    }
}

impl GatewayConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Default::default()
        }
    }

    /// Create config for a Restricted (hardened rollout) deployment
    pub fn restricted() -> Self {
        Self {
            deployment_mode: DeploymentMode::Restricted,
            ..Default::default()
        }
    }

    pub fn marker_ttl_secs(&self) -> i64 {
        self.marker_ttl.as_secs() as i64
    }
}
