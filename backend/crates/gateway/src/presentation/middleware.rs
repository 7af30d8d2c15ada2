//! Gateway Middleware
//!
//! Turns [`GateDecision`]s into HTTP responses. Mount with
//! `axum::middleware::from_fn_with_state` in front of the application
//! router.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::cookie::{self, CookieConfig};
use std::sync::Arc;

use crate::application::config::GatewayConfig;
use crate::application::screen_request::ScreenRequestUseCase;
use crate::domain::decision::GateDecision;
use crate::domain::repository::AuthBackend;
use crate::domain::route::RouteTable;

/// Middleware state
#[derive(Clone)]
pub struct GatewayState<B>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    pub backend: Arc<B>,
    pub routes: Arc<RouteTable>,
    pub config: Arc<GatewayConfig>,
}

impl<B> GatewayState<B>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    pub fn new(backend: B, routes: RouteTable, config: GatewayConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            routes: Arc::new(routes),
            config: Arc::new(config),
        }
    }
}

/// Screen every request through the gateway decision state machine.
pub async fn screen<B>(
    State(state): State<GatewayState<B>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    let token = cookie::extract_cookie(req.headers(), &state.config.session_cookie_name);
    let is_read = matches!(*req.method(), Method::GET | Method::HEAD);
    let path = req.uri().path().to_string();

    let use_case = ScreenRequestUseCase::new(
        state.backend.clone(),
        state.routes.clone(),
        state.config.clone(),
    );

    let decision = use_case.execute(&path, is_read, token.as_deref()).await;

    match decision_response(decision, &state.config) {
        Some(response) => response,
        None => next.run(req).await,
    }
}

/// Map a decision to a response; `None` means let the request through.
///
/// Redirects are 303 See Other so the caller re-requests with GET.
pub fn decision_response(decision: GateDecision, config: &GatewayConfig) -> Option<Response> {
    match decision {
        GateDecision::Allow => None,
        GateDecision::RedirectToRoot => Some(redirect(&config.root_path)),
        GateDecision::RedirectToLogin => Some(redirect(&config.login_path)),
        GateDecision::RedirectToApp { bypassed } => {
            // The marker is a UI-only signal and self-expires; readers
            // must treat a missing cookie as "no marker".
            let marker = CookieConfig {
                secure: config.cookie_secure,
                same_site: config.cookie_same_site,
                ..CookieConfig::ephemeral(
                    config.marker_cookie_name.clone(),
                    config.marker_ttl_secs(),
                )
            };
            let set_cookie = cookie::set_cookie_header(&marker, bypassed.as_str());

            let mut response = redirect(&config.app_home_path);
            response.headers_mut().insert(header::SET_COOKIE, set_cookie);
            Some(response)
        }
    }
}

fn redirect(location: &str) -> Response {
    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}
