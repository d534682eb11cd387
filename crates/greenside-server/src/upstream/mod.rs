//! Client side of the external Golf API.

mod golf_api;

pub use golf_api::GolfApiClient;

use async_trait::async_trait;
use greenside_core::{CourseId, DataKind};
use serde_json::Value;
use thiserror::Error;

/// A successful upstream response.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamPayload {
    /// Parsed response body, persisted and normalized as-is
    pub raw: Value,
    /// Value of `apiRequestsLeft`, when reported
    pub quota_remaining: Option<String>,
}

impl UpstreamPayload {
    pub fn new(raw: Value) -> Self {
        let quota_remaining = greenside_core::quota_remaining(&raw);
        Self {
            raw,
            quota_remaining,
        }
    }
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The provider answered with a non-success status.
    #[error("Golf API returned status {status}")]
    Status { status: u16, body: String },

    /// The request never produced a response.
    #[error("Golf API request failed: {0}")]
    Transport(String),

    /// A success response whose body is not JSON.
    #[error("Golf API returned an invalid body: {0}")]
    InvalidBody(String),

    /// The base URL or course id cannot form a request URL.
    #[error("Invalid Golf API URL: {0}")]
    InvalidUrl(String),
}

/// Fetches raw course data from the provider. One attempt per call.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn fetch(
        &self,
        course_id: &CourseId,
        kind: DataKind,
        credential: &str,
    ) -> Result<UpstreamPayload, UpstreamError>;
}
