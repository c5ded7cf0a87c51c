//! Govi gateway server library logic.
//!
//! Serves the connection-details endpoint that browser and native clients
//! call before joining a realtime voice session, plus a worker-start relay
//! and service-info routes.

pub mod api;
pub mod api_connection;
pub mod config;
pub mod middleware;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Extension, Router,
};
use config::Config;
use govi_voice::TokenService;
use middleware::RateLimiter;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Configuration loaded once at startup.
    pub config: Arc<Config>,
    /// Signs participant tokens.
    pub token_service: Arc<TokenService>,
    /// Client for proxied backend calls.
    pub http: reqwest::Client,
    /// Rate limiter state.
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Builds the state from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed (e.g. the
    /// TLS backend fails to initialise).
    pub fn from_config(config: Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.backend.timeout_ms))
            .build()?;

        Ok(Self {
            token_service: Arc::new(TokenService::new(config.livekit.clone())),
            config: Arc::new(config),
            http,
            rate_limiter: RateLimiter::new(),
        })
    }
}

/// Maximum request body size (64 KiB). No route accepts a meaningful body.
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Headers browsers may send cross-origin.
const CORS_ALLOWED_HEADERS: [&str; 9] = [
    "x-csrf-token",
    "x-requested-with",
    "accept",
    "accept-version",
    "content-length",
    "content-md5",
    "content-type",
    "date",
    "x-api-version",
];

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::DELETE,
            Method::PATCH,
            Method::POST,
            Method::PUT,
        ])
        .allow_headers(CORS_ALLOWED_HEADERS.map(HeaderName::from_static))
        .expose_headers([header::CACHE_CONTROL])
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    if state.config.backend.connection_details_url.is_some() {
        tracing::info!("connection details will be proxied from the configured backend");
    } else if !state.token_service.is_enabled() {
        tracing::warn!(
            missing = ?state.token_service.config().missing_fields(),
            "livekit credentials incomplete; /api/connection-details will return errors"
        );
    }

    let credential_routes = Router::new()
        .route(
            "/api/connection-details",
            get(api_connection::connection_details_handler),
        )
        .route(
            "/api/start-worker",
            post(api_connection::start_worker_handler),
        )
        .layer(axum::middleware::from_fn(middleware::rate_limit_middleware));

    Router::new()
        .route("/", get(api::root_handler))
        .route("/health", get(api::health_handler))
        .merge(credential_routes)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(cors_layer(&state.config.cors.origins))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(Arc::new(state)))
}
