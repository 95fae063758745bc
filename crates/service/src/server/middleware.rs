//! Axum middleware applied to the router.
//!
//! Includes per-client rate limiting, request-id generation, and CORS.
//! Tracing, timeout and compression layers come straight from `tower-http`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use common::ServiceError;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, RequestId},
};
use tracing::warn;

use super::handlers::error_response;
use super::state::AppState;

/// Key used for clients whose peer address is unknown; they share one bucket.
const UNKNOWN_CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Token-bucket limiter keyed by client IP.
pub struct ClientRateLimiter {
    inner: DefaultKeyedRateLimiter<IpAddr>,
}

impl ClientRateLimiter {
    /// Allow `rate` requests per second per client, with a burst of the same size.
    pub fn per_second(rate: NonZeroU32) -> Self {
        Self {
            inner: RateLimiter::keyed(Quota::per_second(rate)),
        }
    }

    /// Take one token for `client`; `false` when its bucket is empty.
    pub fn check(&self, client: IpAddr) -> bool {
        self.inner.check_key(&client).is_ok()
    }

    /// Drop buckets that have refilled completely.
    pub fn retain_recent(&self) {
        self.inner.retain_recent();
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.inner.len()
    }
}

/// Reject requests beyond the caller's quota with `429 Too Many Requests`.
pub async fn rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(UNKNOWN_CLIENT);

    if !state.rate_limiter.check(client) {
        warn!(client = %client, "rate limit exceeded");
        return error_response(&ServiceError::RateLimited);
    }
    next.run(req).await
}

/// CORS policy allowing any origin, method and header.
pub fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Generates a random UUID v4 for each request lacking an `x-request-id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}
