use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::ApiError;

/// Shared secret checked by [`require_bearer`].
#[derive(Clone)]
pub struct ApiSecret(pub Arc<str>);

impl ApiSecret {
    pub fn new(secret: impl AsRef<str>) -> Self {
        Self(Arc::from(secret.as_ref()))
    }
}

/// Rejects requests that do not carry `Authorization: Bearer <secret>`.
pub async fn require_bearer(
    State(secret): State<ApiSecret>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let token = match req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        Some(token) => token,
        None => {
            tracing::debug!(path = %req.uri().path(), "Missing or non-Bearer Authorization header");
            return ApiError::MissingAuthorization.into_response();
        }
    };

    // An unset secret must never match an empty token
    if secret.0.is_empty() || !constant_time_eq(token.as_bytes(), secret.0.as_bytes()) {
        tracing::debug!(path = %req.uri().path(), "Bearer token rejected");
        return ApiError::InvalidToken.into_response();
    }

    next.run(req).await
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

// Middleware that ensures each request has an X-Request-Id and mirrors it on the response
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let header_name = HeaderName::from_static("x-request-id");

    // If the incoming request already has a request-id, preserve it; otherwise generate one
    let req_id_value = match req.headers().get(&header_name) {
        Some(value) => value.clone(),
        None => HeaderValue::from_str(&Uuid::new_v4().to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("unknown")),
    };

    req.extensions_mut().insert(req_id_value.clone());

    let mut res = next.run(req).await;
    res.headers_mut().insert(header_name, req_id_value);
    res
}
