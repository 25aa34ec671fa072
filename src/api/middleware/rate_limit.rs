//! Per-client rate limiting backed by an in-memory governor keyed limiter.

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{
    clock::{Clock, DefaultClock},
    DefaultKeyedRateLimiter, Quota,
};

use crate::api::AppState;
use crate::config::{
    RATE_LIMIT_BURST, RATE_LIMIT_CLEANUP_INTERVAL_SECONDS, RATE_LIMIT_PER_SECOND,
};
use crate::types::ApiResponse;

/// Token bucket per client address
pub struct RateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    /// Burst of 200 requests, refilled at 3 per second
    pub fn new() -> Self {
        Self::with_quota(RATE_LIMIT_PER_SECOND, RATE_LIMIT_BURST)
    }

    pub fn with_quota(per_second: u32, burst: u32) -> Self {
        let rate = NonZeroU32::new(per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN);

        Self {
            limiter: governor::RateLimiter::keyed(Quota::per_second(rate).allow_burst(burst)),
            clock: DefaultClock::default(),
        }
    }

    /// Take one token for `client`, or report how long until one is free.
    pub fn check(&self, client: &str) -> Result<(), Duration> {
        self.limiter
            .check_key(&client.to_string())
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    /// Drop clients whose bucket has refilled completely.
    pub fn cleanup(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

/// Periodically evict idle clients for as long as the limiter is alive.
pub fn spawn_cleanup(limiter: Arc<RateLimiter>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_secs(RATE_LIMIT_CLEANUP_INTERVAL_SECONDS));
        // The first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            limiter.cleanup();
            tracing::debug!(clients = limiter.tracked_clients(), "Rate limiter cleaned up");
        }
    })
}

/// Rate limit error response
#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::failure(
            "Rate limit exceeded",
            "RATE_LIMIT_EXCEEDED",
            "Too many requests, please try again later",
        );

        let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
        response
            .headers_mut()
            .insert(RETRY_AFTER, HeaderValue::from(self.retry_after));
        response
    }
}

/// Extract client identifier for rate limiting.
///
/// Proxy headers win over the socket address: first hop of
/// X-Forwarded-For, then X-Real-IP.
fn client_identifier(request: &Request) -> String {
    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(ip) = header("X-Forwarded-For")
        .and_then(|forwarded| forwarded.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return ip.to_string();
    }

    if let Some(real_ip) = header("X-Real-IP") {
        return real_ip.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rate limiting middleware applied to every route.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let client_id = client_identifier(&request);

    if let Err(wait) = state.rate_limiter.check(&client_id) {
        tracing::warn!(client = %client_id, "Rate limit exceeded");
        return Err(RateLimitError {
            retry_after: wait.as_secs().max(1),
        });
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};

    #[tokio::test]
    async fn test_rate_limit_error_envelope() {
        let response = RateLimitError { retry_after: 2 }.into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[RETRY_AFTER], "2");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Rate limit exceeded");
        assert_eq!(body["error"]["code"], "RATE_LIMIT_EXCEEDED");
    }

    #[test]
    fn test_burst_then_reject() {
        let limiter = RateLimiter::with_quota(1, 3);

        for _ in 0..3 {
            assert!(limiter.check("10.0.0.1").is_ok());
        }
        assert!(limiter.check("10.0.0.1").is_err());
        assert!(limiter.check("10.0.0.2").is_ok());
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn test_cleanup_evicts_idle_clients() {
        let limiter = RateLimiter::with_quota(1000, 1);
        limiter.check("10.0.0.9").unwrap();

        std::thread::sleep(Duration::from_millis(20));
        limiter.cleanup();
        assert_eq!(limiter.tracked_clients(), 0);
    }

    #[test]
    fn test_client_identifier_precedence() {
        let request = Request::builder()
            .header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
            .header("X-Real-IP", "198.51.100.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_identifier(&request), "203.0.113.7");

        let request = Request::builder()
            .header("X-Real-IP", "198.51.100.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_identifier(&request), "198.51.100.2");

        let mut request = Request::new(Body::empty());
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 4000))));
        assert_eq!(client_identifier(&request), "192.0.2.1");
    }
}
