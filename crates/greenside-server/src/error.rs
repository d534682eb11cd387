//! Error types surfaced over HTTP.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use greenside_storage::{DecodeError, StorageError};
use serde_json::json;
use thiserror::Error;

use crate::upstream::UpstreamError;

/// Failure of a single resolve call.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The cache store could not be reached or queried.
    #[error("Database error: {0}")]
    Store(#[from] StorageError),

    /// Cached or fetched data could not be interpreted.
    #[error("{0}")]
    Data(String),

    /// The provider answered with a non-success status; forwarded verbatim.
    #[error("Golf API request failed with status {status}")]
    UpstreamHttp { status: u16, body: String },

    /// The provider could not be reached.
    #[error("Failed to fetch from Golf API: {0}")]
    UpstreamTransport(String),

    /// Required configuration is absent.
    #[error("{0}")]
    Config(String),
}

impl ResolveError {
    pub fn missing_credential() -> Self {
        Self::Config("Golf API token not configured".into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UpstreamHttp { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DecodeError> for ResolveError {
    fn from(e: DecodeError) -> Self {
        Self::Data(e.to_string())
    }
}

impl From<UpstreamError> for ResolveError {
    fn from(e: UpstreamError) -> Self {
        match e {
            UpstreamError::Status { status, body } => Self::UpstreamHttp { status, body },
            UpstreamError::Transport(msg) => Self::UpstreamTransport(msg),
            UpstreamError::InvalidBody(msg) => {
                Self::Data(format!("Invalid JSON data from Golf API: {msg}"))
            }
            UpstreamError::InvalidUrl(msg) => Self::Config(format!("Invalid Golf API URL: {msg}")),
        }
    }
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Self::Store(e) => {
                tracing::error!(error = %e, category = %e.category(), "Store failure during resolve");
                json!({"error": "Database error", "details": e.to_string()})
            }
            Self::Data(details) => json!({"error": "Server error", "details": details}),
            Self::UpstreamHttp { status, body } => json!({
                "error": "Golf API request failed",
                "status_code": status,
                "details": body,
            }),
            Self::UpstreamTransport(details) => {
                json!({"error": "Failed to fetch from Golf API", "details": details})
            }
            Self::Config(message) => json!({"error": message}),
        };
        (status, Json(body)).into_response()
    }
}

/// Errors produced by the HTTP layer outside of resolution.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing or invalid authorization header")]
    MissingAuthorization,

    #[error("Invalid authorization token")]
    InvalidToken,

    #[error("{0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    #[error("Database error: {0}")]
    Store(#[from] StorageError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingAuthorization | Self::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                [("WWW-Authenticate", "Bearer")],
                Json(json!({"error": self.to_string()})),
            )
                .into_response(),
            Self::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({"error": message}))).into_response()
            }
            Self::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({"error": "Not found"}))).into_response()
            }
            Self::Store(e) => {
                tracing::error!(error = %e, category = %e.category(), "Store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Database error", "details": e.to_string()})),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_upstream_status_is_forwarded() {
        let err = ResolveError::from(UpstreamError::Status {
            status: 429,
            body: r#"{"msg":"rate limited"}"#.into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            body_json(response).await,
            json!({
                "error": "Golf API request failed",
                "status_code": 429,
                "details": r#"{"msg":"rate limited"}"#
            })
        );
    }

    #[tokio::test]
    async fn test_missing_credential_shape() {
        let response = ResolveError::missing_credential().into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Golf API token not configured"})
        );
    }

    #[tokio::test]
    async fn test_store_error_shape() {
        let response =
            ResolveError::from(StorageError::connection_error("pool timed out")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Database error");
        assert!(body["details"].as_str().unwrap().contains("pool timed out"));
    }

    #[tokio::test]
    async fn test_transport_and_invalid_body() {
        let response = ResolveError::from(UpstreamError::Transport("refused".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Failed to fetch from Golf API");

        let response =
            ResolveError::from(UpstreamError::InvalidBody("expected value".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Server error");
    }

    #[tokio::test]
    async fn test_unauthorized_carries_challenge() {
        let response = ApiError::InvalidToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()["www-authenticate"], "Bearer");
        assert_eq!(
            body_json(response).await,
            json!({"error": "Invalid authorization token"})
        );
    }
}
