use std::time::Duration;

use async_trait::async_trait;
use greenside_core::{CourseId, DataKind};
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{UpstreamClient, UpstreamError, UpstreamPayload};

/// reqwest-backed client for `golfapi.io`.
#[derive(Debug, Clone)]
pub struct GolfApiClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl GolfApiClient {
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| UpstreamError::InvalidUrl(format!("{}: {e}", base_url.as_ref())))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    /// `/coordinates/{id}` for green locations, `/courses/{id}` for course info.
    ///
    /// The course id is appended as one percent-encoded path segment, so it
    /// can never add path levels or a query string.
    pub fn url_for(&self, course_id: &CourseId, kind: DataKind) -> Result<Url, UpstreamError> {
        let segment = match kind {
            DataKind::Coordinates => "coordinates",
            DataKind::Info => "courses",
        };
        // Dot segments would be dropped by the URL serializer
        if matches!(course_id.as_str(), "." | "..") {
            return Err(UpstreamError::InvalidUrl(format!(
                "course id {course_id:?} is not a path segment"
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(segment)
            .push(course_id.as_str());
        Ok(url)
    }
}

#[async_trait]
impl UpstreamClient for GolfApiClient {
    #[instrument(skip(self, credential), fields(course_id = %course_id, kind = %kind))]
    async fn fetch(
        &self,
        course_id: &CourseId,
        kind: DataKind,
        credential: &str,
    ) -> Result<UpstreamPayload, UpstreamError> {
        let url = self.url_for(course_id, kind)?;
        debug!(url = %url, "Calling Golf API");

        let response = self
            .http
            .get(url)
            .bearer_auth(credential)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UpstreamError::Transport(format!(
                        "request timed out after {} ms",
                        self.timeout.as_millis()
                    ))
                } else if e.is_connect() {
                    UpstreamError::Transport(format!("failed to connect: {e}"))
                } else {
                    UpstreamError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::Transport(format!("failed to read body: {e}")))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Golf API request failed");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw: Value =
            serde_json::from_str(&body).map_err(|e| UpstreamError::InvalidBody(e.to_string()))?;
        let payload = UpstreamPayload::new(raw);
        debug!(quota_remaining = ?payload.quota_remaining, "Golf API request succeeded");
        Ok(payload)
    }
}
