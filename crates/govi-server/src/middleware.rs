use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::api::{error_response, ApiError};
use crate::AppState;

const WINDOW: Duration = Duration::from_secs(60);

/// In-memory rate limiter state.
///
/// Uses a simple fixed window counter keyed by client IP.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    state: Arc<Mutex<HashMap<IpAddr, (u32, Instant)>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Check if the request is allowed.
    ///
    /// Returns `true` if allowed, `false` if limit exceeded.
    pub fn check(&self, key: IpAddr, limit: u32) -> bool {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                // A stale counter is the worst outcome of reusing the guard.
                tracing::error!("rate limiter lock poisoned, recovering with stale state");
                poisoned.into_inner()
            }
        };
        let now = Instant::now();

        // Evict expired windows only; a blanket clear would reset active limits.
        if state.len() > 10000 {
            state.retain(|_, (_, start)| now.duration_since(*start) <= WINDOW);
        }

        let (count, start) = state.entry(key).or_insert((0, now));

        if now.duration_since(*start) > WINDOW {
            *count = 1;
            *start = now;
            true
        } else {
            *count += 1;
            *count <= limit
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Rate limiting middleware for the credential routes.
///
/// Every accepted request can mint a token, so limits are per client IP.
/// Requires `ConnectInfo<SocketAddr>`; a router served without it is a
/// misconfiguration and fails closed.
pub async fn rate_limit_middleware(req: Request<Body>, next: Next) -> Response {
    let Some(state) = req.extensions().get::<Arc<AppState>>().cloned() else {
        return ApiError::Internal("application state is not installed".to_string())
            .into_response();
    };

    let limit = state.config.rate_limit.requests_per_minute;
    if limit == 0 {
        return next.run(req).await;
    }

    let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() else {
        return ApiError::Internal(
            "client address unavailable; serve with connect info enabled".to_string(),
        )
        .into_response();
    };
    let ip = addr.ip();

    if !state.rate_limiter.check(ip, limit) {
        tracing::warn!(%ip, path = req.uri().path(), "rate limit exceeded");
        let mut response = error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "too many requests; retry in 60 seconds",
        );
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from_static("60"));
        return response;
    }

    next.run(req).await
}
