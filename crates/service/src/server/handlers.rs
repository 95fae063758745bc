//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{ErrorResponse, HealthResponse, SignResponse, VerifyRequest};
use common::{Payload, ServiceError};
use tracing::{debug, warn};

use super::state::AppState;
use crate::crypto::{verify_signature, Verification};

/// `POST /encrypt` — replace every top-level value with its encrypted form.
pub async fn encrypt(
    State(state): State<AppState>,
    body: Result<Json<Payload>, JsonRejection>,
) -> Response {
    let payload = match body {
        Ok(Json(p)) => p,
        Err(rejection) => return malformed_input(rejection),
    };

    match state.encryption.encrypt(&payload) {
        Ok(encrypted) => (StatusCode::OK, Json(encrypted)).into_response(),
        Err(e) => {
            warn!(field = %e.field, error = %e.source, "encryption failed");
            error_response(&e.into())
        }
    }
}

/// `POST /decrypt` — restore every top-level value from its encrypted form.
pub async fn decrypt(
    State(state): State<AppState>,
    body: Result<Json<Payload>, JsonRejection>,
) -> Response {
    let payload = match body {
        Ok(Json(p)) => p,
        Err(rejection) => return malformed_input(rejection),
    };

    match state.encryption.decrypt(&payload) {
        Ok(decrypted) => (StatusCode::OK, Json(decrypted)).into_response(),
        Err(e) => {
            warn!(field = %e.field, error = %e.source, "decryption failed");
            error_response(&e.into())
        }
    }
}

/// `POST /sign` — compute a signature over the whole payload.
pub async fn sign(
    State(state): State<AppState>,
    body: Result<Json<Payload>, JsonRejection>,
) -> Response {
    let payload = match body {
        Ok(Json(p)) => p,
        Err(rejection) => return malformed_input(rejection),
    };

    match state.signing.sign(&payload) {
        Ok(signature) => (StatusCode::OK, Json(SignResponse { signature })).into_response(),
        Err(e) => {
            warn!(error = %e, "signing failed");
            error_response(&e.into())
        }
    }
}

/// `POST /verify` — `204 No Content` when the signature matches the data.
///
/// A mismatch answers `invalid_signature`; a signature that cannot be
/// recomputed answers `bad_request`.
pub async fn verify(
    State(state): State<AppState>,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(r)) => r,
        Err(rejection) => return malformed_input(rejection),
    };

    match verify_signature(state.signing.as_ref(), &req.data, &req.signature) {
        Ok(Verification::Verified) => StatusCode::NO_CONTENT.into_response(),
        Ok(Verification::Mismatch) => error_response(&ServiceError::InvalidSignature),
        Err(e) => {
            warn!(error = %e, "signature could not be recomputed");
            error_response(&ServiceError::BadRequest(e.to_string()))
        }
    }
}

/// `GET /health` — liveness check reporting the configured strategies.
pub async fn health(State(state): State<AppState>) -> Response {
    let body = HealthResponse {
        status: "ok".into(),
        encryption: state.encryption.name().into(),
        signing: state.signing.name().into(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Static OpenAPI 3.0 description of every route.
const OPENAPI_DOCUMENT: &str = include_str!("../../openapi.json");

/// `GET /openapi.json`: the API description.
pub async fn openapi() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        OPENAPI_DOCUMENT,
    )
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

/// Render a [`ServiceError`] as its status code and JSON body.
pub fn error_response(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err))).into_response()
}

fn malformed_input(rejection: JsonRejection) -> Response {
    debug!(reason = %rejection.body_text(), "rejected request body");
    error_response(&ServiceError::BadRequest("invalid JSON".into()))
}
