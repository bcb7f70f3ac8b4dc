mod auth;
mod config;
mod db;
mod errors;
mod models;
mod profile;
mod routes;
mod sms;
mod state;
mod subscription;
mod users;

use anyhow::Result;
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::JwtVerifier;
use crate::config::Config;
use crate::db::create_pool;
use crate::profile::ProfileService;
use crate::routes::build_router;
use crate::sms::{HttpSmsSender, MetadataVerificationCodes, RedisRateLimiter};
use crate::state::AppState;
use crate::subscription::SubscriptionChecker;
use crate::users::PgUserStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Profile API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize Redis (daily SMS counters)
    let redis = redis::Client::open(config.redis_url.clone())?
        .get_multiplexed_async_connection()
        .await?;
    info!("Redis connection established");

    if config.sms.is_configured() {
        info!("SMS gateway configured");
    } else {
        warn!("SMS gateway not configured; phone verification is disabled");
    }

    let profile = ProfileService::new(
        Arc::new(PgUserStore::new(db)),
        Arc::new(SubscriptionChecker),
        Arc::new(MetadataVerificationCodes::new(
            config.sms.verification_timeout_secs,
        )),
        Arc::new(HttpSmsSender::new(config.sms.clone())),
        Arc::new(RedisRateLimiter::new(redis, config.sms.clone())),
        config.sms.clone(),
    );

    // Build app state
    let state = AppState {
        auth: Arc::new(JwtVerifier::new(&config.jwt_secret)),
        profile,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `*` allows any origin; otherwise a comma-separated allow-list.
fn cors_layer(origins: &str) -> CorsLayer {
    if origins.trim() == "*" {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{o}'");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}
