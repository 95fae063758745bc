//! Axum router construction.

use std::time::Duration;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::{handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/encrypt", post(handlers::encrypt))
        .route("/decrypt", post(handlers::decrypt))
        .route("/sign", post(handlers::sign))
        .route("/verify", post(handlers::verify))
        .route("/health", get(handlers::health))
        .route("/openapi.json", get(handlers::openapi))
        .fallback(handlers::not_found)
        .layer(from_fn_with_state(state.clone(), middleware::rate_limit))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CompressionLayer::new())
        .layer(middleware::cors())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuidV4))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU32;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use common::protocol::HealthResponse;
    use tower::ServiceExt;

    use crate::server::middleware::ClientRateLimiter;

    const TIMEOUT: Duration = Duration::from_secs(30);

    fn app() -> Router {
        build(AppState::for_tests(), TIMEOUT)
    }

    fn post_json(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let req = Request::builder()
            .uri("/unknown")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_reports_strategies() {
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let health: HealthResponse = body_json(resp).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.encryption, "base64");
        assert_eq!(health.signing, "hmac-sha256");
    }

    #[tokio::test]
    async fn openapi_document_describes_every_route() {
        let req = Request::builder()
            .uri("/openapi.json")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");

        let doc: openapiv3::OpenAPI = body_json(resp).await;
        assert!(doc.openapi.starts_with("3.0"));
        for path in ["/encrypt", "/decrypt", "/sign", "/verify"] {
            match doc.paths.paths.get(path) {
                Some(openapiv3::ReferenceOr::Item(item)) => {
                    assert!(item.post.is_some(), "{path} has no POST operation")
                }
                other => panic!("{path} missing or a reference: {other:?}"),
            }
        }
        match doc.paths.paths.get("/health") {
            Some(openapiv3::ReferenceOr::Item(item)) => assert!(item.get.is_some()),
            other => panic!("/health missing or a reference: {other:?}"),
        }
        assert_eq!(doc.paths.paths.len(), 5);
    }

    #[tokio::test]
    async fn syntactically_invalid_json_is_bad_request() {
        let resp = app().oneshot(post_json("/encrypt", "{oops")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_content_type_is_bad_request() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/sign")
            .body(Body::from(r#"{"key1":"value1"}"#))
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let resp = app()
            .oneshot(post_json("/encrypt", r#"{"key1":"value1"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn incoming_request_id_is_propagated() {
        let req = Request::builder()
            .uri("/health")
            .header("x-request-id", "caller-chosen-id")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.headers()["x-request-id"], "caller-chosen-id");
    }

    #[tokio::test]
    async fn cors_preflight_is_answered() {
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/encrypt")
            .header(header::ORIGIN, "https://example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn rate_limit_returns_429() {
        let state = AppState {
            rate_limiter: Arc::new(ClientRateLimiter::per_second(NonZeroU32::new(1).unwrap())),
            ..AppState::for_tests()
        };
        let app = build(state, TIMEOUT);

        let first = app
            .clone()
            .oneshot(post_json("/sign", r#"{"key1":"value1"}"#))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(post_json("/sign", r#"{"key1":"value1"}"#))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        let body: common::protocol::ErrorResponse = body_json(second).await;
        assert_eq!(body.code, "rate_limited");
    }
}
