//! Unit tests for the gateway crate

#[cfg(test)]
mod route_tests {
    use crate::domain::route::*;

    #[test]
    fn test_exact_path_matching() {
        let table = RouteTable::with_defaults();

        assert_eq!(
            table.classify("/", DeploymentMode::Standard),
            RouteClass::Public
        );
        assert_eq!(
            table.classify("/about", DeploymentMode::Standard),
            RouteClass::Public
        );
        // Sub-paths of a public path are not public
        assert_eq!(
            table.classify("/about/team", DeploymentMode::Standard),
            RouteClass::Protected
        );
        // Unlisted paths default to Protected
        assert_eq!(
            table.classify("/chat", DeploymentMode::Standard),
            RouteClass::Protected
        );
        assert_eq!(
            table.classify("/settings", DeploymentMode::Standard),
            RouteClass::Protected
        );
    }

    #[test]
    fn test_auth_pages() {
        let table = RouteTable::with_defaults();

        assert_eq!(
            table.classify("/login", DeploymentMode::Standard),
            RouteClass::AuthOnly(AuthPage::Login)
        );
        assert_eq!(
            table.classify("/register", DeploymentMode::Standard),
            RouteClass::AuthOnly(AuthPage::Register)
        );
        assert_eq!(
            table.classify("/forgot-password", DeploymentMode::Standard),
            RouteClass::AuthOnly(AuthPage::ForgotPassword)
        );
        assert_eq!(
            table.classify("/verify", DeploymentMode::Standard),
            RouteClass::AuthOnly(AuthPage::VerifyCode)
        );
    }

    #[test]
    fn test_restricted_mode_allow_list() {
        let table = RouteTable::with_defaults();

        // Allow-listed paths keep their normal category
        assert_eq!(
            table.classify("/", DeploymentMode::Restricted),
            RouteClass::Public
        );
        assert_eq!(
            table.classify("/waitlist", DeploymentMode::Restricted),
            RouteClass::Public
        );

        // Everything else is forced out, including otherwise-public
        // and auth-only paths
        assert_eq!(
            table.classify("/about", DeploymentMode::Restricted),
            RouteClass::OutsideProduction
        );
        assert_eq!(
            table.classify("/login", DeploymentMode::Restricted),
            RouteClass::OutsideProduction
        );
        assert_eq!(
            table.classify("/chat", DeploymentMode::Restricted),
            RouteClass::OutsideProduction
        );
    }

    #[test]
    fn test_classification_is_idempotent() {
        let table = RouteTable::with_defaults();

        for path in ["/", "/login", "/chat", "/nonexistent"] {
            for mode in [DeploymentMode::Standard, DeploymentMode::Restricted] {
                assert_eq!(table.classify(path, mode), table.classify(path, mode));
            }
        }
    }

    #[test]
    fn test_empty_table_defaults_protected() {
        let table = RouteTable::new();
        assert_eq!(
            table.classify("/", DeploymentMode::Standard),
            RouteClass::Protected
        );
    }

    #[test]
    fn test_auth_page_names() {
        assert_eq!(AuthPage::Login.as_str(), "login");
        assert_eq!(AuthPage::Register.as_str(), "register");
        assert_eq!(AuthPage::ForgotPassword.as_str(), "forgot-password");
        assert_eq!(AuthPage::VerifyCode.as_str(), "verify");
    }
}

#[cfg(test)]
mod decision_tests {
    use crate::application::config::GatewayConfig;
    use crate::application::screen_request::ScreenRequestUseCase;
    use crate::domain::decision::GateDecision;
    use crate::domain::repository::{AuthBackend, TokenVerification};
    use crate::domain::route::{AuthPage, DeploymentMode, RouteTable};
    use crate::error::{GatewayError, GatewayResult};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Backend stub: counts calls, returns a canned outcome.
    #[derive(Clone)]
    struct StubBackend {
        calls: Arc<AtomicUsize>,
        behavior: Behavior,
    }

    #[derive(Clone)]
    enum Behavior {
        Valid(&'static str),
        Invalid,
        Error,
        Hang(Duration),
    }

    impl StubBackend {
        fn new(behavior: Behavior) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                behavior,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl AuthBackend for StubBackend {
        async fn verify_token(&self, _token: &str) -> GatewayResult<TokenVerification> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Behavior::Valid(subject) => Ok(TokenVerification::valid(*subject)),
                Behavior::Invalid => Ok(TokenVerification::invalid()),
                Behavior::Error => Err(GatewayError::Upstream("connection refused".into())),
                Behavior::Hang(delay) => {
                    tokio::time::sleep(*delay).await;
                    Ok(TokenVerification::valid("late"))
                }
            }
        }
    }

    fn use_case(backend: &StubBackend, config: GatewayConfig) -> ScreenRequestUseCase<StubBackend> {
        ScreenRequestUseCase::new(
            Arc::new(backend.clone()),
            Arc::new(RouteTable::with_defaults()),
            Arc::new(config),
        )
    }

    #[tokio::test]
    async fn test_public_allows_without_token() {
        let backend = StubBackend::new(Behavior::Invalid);
        let gate = use_case(&backend, GatewayConfig::default());

        let decision = gate.execute("/about", true, None).await;
        assert_eq!(decision, GateDecision::Allow);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_public_allows_when_backend_down() {
        // Public pages must render even with a token present and the
        // verifier erroring; no verification happens at all.
        let backend = StubBackend::new(Behavior::Error);
        let gate = use_case(&backend, GatewayConfig::default());

        let decision = gate.execute("/about", true, Some("some-token")).await;
        assert_eq!(decision, GateDecision::Allow);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_protected_without_token_redirects_to_login() {
        let backend = StubBackend::new(Behavior::Valid("user-1"));
        let gate = use_case(&backend, GatewayConfig::default());

        let decision = gate.execute("/chat", true, None).await;
        assert_eq!(decision, GateDecision::RedirectToLogin);
        // Absent token never reaches the backend
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_protected_with_empty_token_redirects_to_login() {
        let backend = StubBackend::new(Behavior::Valid("user-1"));
        let gate = use_case(&backend, GatewayConfig::default());

        let decision = gate.execute("/chat", true, Some("")).await;
        assert_eq!(decision, GateDecision::RedirectToLogin);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_protected_with_invalid_token_redirects_to_login() {
        let backend = StubBackend::new(Behavior::Invalid);
        let gate = use_case(&backend, GatewayConfig::default());

        let decision = gate.execute("/chat", true, Some("stale")).await;
        assert_eq!(decision, GateDecision::RedirectToLogin);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_backend_error_fails_closed() {
        let backend = StubBackend::new(Behavior::Error);
        let gate = use_case(&backend, GatewayConfig::default());

        let decision = gate.execute("/chat", true, Some("token")).await;
        assert_eq!(decision, GateDecision::RedirectToLogin);
    }

    #[tokio::test]
    async fn test_backend_timeout_fails_closed() {
        let backend = StubBackend::new(Behavior::Hang(Duration::from_millis(200)));
        let config = GatewayConfig {
            verify_timeout: Duration::from_millis(20),
            ..GatewayConfig::default()
        };
        let gate = use_case(&backend, config);

        let decision = gate.execute("/chat", true, Some("token")).await;
        assert_eq!(decision, GateDecision::RedirectToLogin);
    }

    #[tokio::test]
    async fn test_valid_token_allows_protected() {
        let backend = StubBackend::new(Behavior::Valid("user-1"));
        let gate = use_case(&backend, GatewayConfig::default());

        let decision = gate.execute("/chat", true, Some("good")).await;
        assert_eq!(decision, GateDecision::Allow);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_restricted_mode_redirects_even_valid_sessions() {
        let backend = StubBackend::new(Behavior::Valid("user-1"));
        let gate = use_case(&backend, GatewayConfig::restricted());

        for path in ["/chat", "/about", "/login"] {
            let decision = gate.execute(path, true, Some("good")).await;
            assert_eq!(decision, GateDecision::RedirectToRoot, "path {path}");
        }
        // The override short-circuits before any verification
        assert_eq!(backend.call_count(), 0);

        // Allow-listed public paths still served
        let decision = gate.execute("/waitlist", true, Some("good")).await;
        assert_eq!(decision, GateDecision::Allow);
    }

    #[tokio::test]
    async fn test_authenticated_read_of_auth_page_bounces_to_app() {
        let backend = StubBackend::new(Behavior::Valid("user-1"));
        let gate = use_case(&backend, GatewayConfig::default());

        let decision = gate.execute("/login", true, Some("good")).await;
        assert_eq!(
            decision,
            GateDecision::RedirectToApp {
                bypassed: AuthPage::Login
            }
        );

        let decision = gate.execute("/register", true, Some("good")).await;
        assert_eq!(
            decision,
            GateDecision::RedirectToApp {
                bypassed: AuthPage::Register
            }
        );
    }

    #[tokio::test]
    async fn test_authenticated_post_to_auth_page_is_not_bounced() {
        // Non-read requests skip the bypass and fall through to the
        // default-deny check, which the valid token passes.
        let backend = StubBackend::new(Behavior::Valid("user-1"));
        let gate = use_case(&backend, GatewayConfig::default());

        let decision = gate.execute("/login", false, Some("good")).await;
        assert_eq!(decision, GateDecision::Allow);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_auth_page_verifies_at_most_once() {
        // Invalid token on a read of an auth page: the bypass check
        // verifies, the default-deny check reuses the result.
        let backend = StubBackend::new(Behavior::Invalid);
        let gate = use_case(&backend, GatewayConfig::default());

        let decision = gate.execute("/login", true, Some("stale")).await;
        assert_eq!(decision, GateDecision::RedirectToLogin);
        assert_eq!(backend.call_count(), 1);
    }
}

#[cfg(test)]
mod verify_token_tests {
    use crate::application::config::GatewayConfig;
    use crate::application::verify_token::{TokenStatus, VerifyTokenUseCase};
    use crate::domain::repository::{AuthBackend, TokenVerification};
    use crate::error::GatewayResult;
    use std::sync::Arc;

    #[derive(Clone)]
    struct SubjectlessBackend;

    impl AuthBackend for SubjectlessBackend {
        async fn verify_token(&self, _token: &str) -> GatewayResult<TokenVerification> {
            Ok(TokenVerification {
                valid: true,
                subject_id: None,
            })
        }
    }

    #[tokio::test]
    async fn test_valid_without_subject_is_rejected() {
        let use_case = VerifyTokenUseCase::new(
            Arc::new(SubjectlessBackend),
            Arc::new(GatewayConfig::default()),
        );

        let status = use_case.execute(Some("token")).await;
        assert_eq!(status, TokenStatus::Invalid);
    }

    #[tokio::test]
    async fn test_absent_and_empty_tokens_are_invalid() {
        let use_case = VerifyTokenUseCase::new(
            Arc::new(SubjectlessBackend),
            Arc::new(GatewayConfig::default()),
        );

        assert_eq!(use_case.execute(None).await, TokenStatus::Invalid);
        assert_eq!(use_case.execute(Some("")).await, TokenStatus::Invalid);
    }
}

#[cfg(test)]
mod middleware_tests {
    use crate::application::config::GatewayConfig;
    use crate::domain::decision::GateDecision;
    use crate::domain::route::AuthPage;
    use crate::presentation::middleware::decision_response;
    use axum::http::{StatusCode, header};

    #[test]
    fn test_allow_passes_through() {
        let config = GatewayConfig::default();
        assert!(decision_response(GateDecision::Allow, &config).is_none());
    }

    #[test]
    fn test_login_redirect() {
        let config = GatewayConfig::default();
        let response = decision_response(GateDecision::RedirectToLogin, &config).unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login"
        );
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[test]
    fn test_root_redirect() {
        let config = GatewayConfig::default();
        let response = decision_response(GateDecision::RedirectToRoot, &config).unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    }

    #[test]
    fn test_app_redirect_sets_marker_cookie() {
        let config = GatewayConfig::default();
        let response = decision_response(
            GateDecision::RedirectToApp {
                bypassed: AuthPage::Login,
            },
            &config,
        )
        .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/chat");

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cookie.contains("redirected-from=login"));
        assert!(cookie.contains("Max-Age=5"));
        // UI script has to read the marker
        assert!(!cookie.contains("HttpOnly"));
    }
}

#[cfg(test)]
mod config_tests {
    use crate::application::config::GatewayConfig;
    use crate::domain::route::DeploymentMode;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();

        assert_eq!(config.deployment_mode, DeploymentMode::Standard);
        assert_eq!(config.session_cookie_name, "auth_session");
        assert_eq!(config.marker_cookie_name, "redirected-from");
        assert_eq!(config.marker_ttl, Duration::from_secs(5));
        assert_eq!(config.verify_timeout, Duration::from_secs(3));
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.app_home_path, "/chat");
        assert!(config.cookie_secure);
    }

    #[test]
    fn test_restricted_config() {
        let config = GatewayConfig::restricted();
        assert_eq!(config.deployment_mode, DeploymentMode::Restricted);
    }

    #[test]
    fn test_development_config() {
        let config = GatewayConfig::development();
        assert!(!config.cookie_secure);
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::GatewayError;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            GatewayError::Upstream("down".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            GatewayError::VerifyTimeout.status_code(),
            StatusCode::REQUEST_TIMEOUT
        );
        assert_eq!(
            GatewayError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_responses_have_empty_bodies() {
        let response = GatewayError::Upstream("down".into()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
