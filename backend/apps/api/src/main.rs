//! API Server Entry Point
//!
//! Wires the OTP endpoints and the gateway middleware over a shared
//! Postgres pool. Startup errors use `anyhow`; request-path errors
//! stay inside the gateway and otp crates.

mod delivery;
mod directory;

use anyhow::Context;
use axum::{
    Router, http,
    http::{Method, header},
};
use gateway::{GatewayConfig, GatewayState, RouteTable};
use otp::{OtpConfig, PgOtpRepository, otp_router};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::delivery::LogCodeDelivery;
use crate::directory::PgDirectory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,gateway=info,otp=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // OTP configuration
    let otp_config = if cfg!(debug_assertions) {
        OtpConfig::development()
    } else {
        OtpConfig::default()
    };

    // Session secret for token signing. Debug builds mint a throwaway
    // secret (and log it so a restarted frontend can keep its cookie);
    // release builds require SESSION_SECRET.
    let session_secret: [u8; 32] = if cfg!(debug_assertions) && env::var("SESSION_SECRET").is_err()
    {
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&platform::crypto::random_bytes(32));
        tracing::debug!(
            secret = %platform::crypto::to_base64(&secret),
            "Generated ephemeral session secret; set SESSION_SECRET to pin it"
        );
        secret
    } else {
        let secret_b64 = env::var("SESSION_SECRET").context("SESSION_SECRET must be set")?;
        let secret_bytes = platform::crypto::from_base64(&secret_b64)
            .context("SESSION_SECRET is not valid base64")?;
        secret_bytes
            .as_slice()
            .try_into()
            .context("SESSION_SECRET must decode to exactly 32 bytes")?
    };

    // Gateway configuration
    let restricted = env::var("DEPLOYMENT_MODE")
        .map(|v| v.eq_ignore_ascii_case("restricted"))
        .unwrap_or(false);
    let mut gateway_config = if restricted {
        GatewayConfig::restricted()
    } else {
        GatewayConfig::default()
    };
    if cfg!(debug_assertions) {
        gateway_config.cookie_secure = false;
    }

    let repo = PgOtpRepository::new(pool.clone());
    let directory = PgDirectory::new(pool.clone(), session_secret, otp_config.session_ttl);

    // Startup cleanup: remove stale challenges, registrations, sessions
    // Errors here should not prevent server startup
    match repo
        .cleanup_expired(otp_config.validity_window(), otp_config.pending_ttl_window())
        .await
    {
        Ok((challenges, registrations)) => {
            tracing::info!(
                challenges_deleted = challenges,
                registrations_deleted = registrations,
                "OTP cleanup completed"
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, "OTP cleanup failed, continuing anyway");
        }
    }

    if let Err(e) = directory.cleanup_expired().await {
        tracing::warn!(error = %e, "Session cleanup failed, continuing anyway");
    }

    // The OTP endpoints run pre-authentication, so the gateway serves
    // them as public
    let routes = RouteTable::with_defaults()
        .public("/api/otp/issue")
        .public("/api/otp/resend")
        .public("/api/otp/verify");

    let gateway_state = GatewayState::new(directory.clone(), routes, gateway_config);

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest(
            "/api/otp",
            otp_router(repo, LogCodeDelivery, directory.clone(), otp_config),
        )
        .layer(axum::middleware::from_fn_with_state(
            gateway_state,
            gateway::screen::<PgDirectory>,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 31113));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
