//! Cache-aside resolution of course data.
//!
//! A request is served from the store when a row exists for its cache key.
//! Otherwise the Golf API is called once, the raw payload is persisted, a
//! notice is handed to the notifier, and the payload is normalized. Auth and
//! HTTP concerns live in the server layer.

use std::sync::Arc;

use greenside_core::{
    CacheKey, CourseId, DataKind, GreenCenters, ParTable, extract_green_centers, extract_pars,
};
use greenside_notifications::{Notifier, UpstreamCallNotice};
use greenside_storage::{KeyValueStore, decode_value};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::courses::CourseCatalog;
use crate::error::ResolveError;
use crate::upstream::UpstreamClient;

/// Normalized response body for either data kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedCourseData {
    Coordinates(GreenCenters),
    Info(ParTable),
}

impl NormalizedCourseData {
    pub fn from_raw(kind: DataKind, raw: &Value) -> Self {
        match kind {
            DataKind::Coordinates => Self::Coordinates(extract_green_centers(raw)),
            DataKind::Info => Self::Info(extract_pars(raw)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResolverOptions {
    /// Golf API bearer token. Cache misses fail with a configuration error while unset.
    pub credential: Option<String>,
    /// Fetch again instead of failing when a cached row cannot be decoded
    pub refetch_on_corrupt: bool,
}

pub struct CacheAsideResolver {
    store: Arc<dyn KeyValueStore>,
    upstream: Arc<dyn UpstreamClient>,
    notifier: Arc<dyn Notifier>,
    courses: Arc<CourseCatalog>,
    options: ResolverOptions,
}

impl CacheAsideResolver {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        upstream: Arc<dyn UpstreamClient>,
        notifier: Arc<dyn Notifier>,
        courses: Arc<CourseCatalog>,
        options: ResolverOptions,
    ) -> Self {
        Self {
            store,
            upstream,
            notifier,
            courses,
            options,
        }
    }

    #[instrument(skip(self), fields(course_id = %course_id, kind = %kind))]
    pub async fn resolve(
        &self,
        course_id: &CourseId,
        kind: DataKind,
    ) -> Result<NormalizedCourseData, ResolveError> {
        let key = CacheKey::new(kind, course_id);

        if let Some(entry) = self.store.get(key.as_str()).await? {
            match decode_value(&entry.value) {
                Ok(raw) => {
                    debug!(key = %key, "Cache hit");
                    return Ok(NormalizedCourseData::from_raw(kind, &raw));
                }
                Err(e) if self.options.refetch_on_corrupt => {
                    warn!(key = %key, error = %e, "Cached value is corrupt, fetching again");
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Cached value is corrupt");
                    return Err(e.into());
                }
            }
        }

        let credential = self
            .options
            .credential
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or_else(ResolveError::missing_credential)?;

        info!(key = %key, "Cache miss, fetching from Golf API");
        let payload = self.upstream.fetch(course_id, kind, credential).await?;

        // Always store JSON text, so a string payload keeps its quotes
        let stored = payload.raw.to_string();
        self.store.put(key.as_str(), &stored).await?;
        debug!(key = %key, "Persisted upstream payload");

        // Answer from the stored form so the next hit renders the same body
        let cached = decode_value(&Value::String(stored))?;

        let notice = UpstreamCallNotice {
            course_id: course_id.to_string(),
            course_name: self.courses.name_for(course_id.as_str()).to_string(),
            kind,
            payload: payload.raw.clone(),
            quota_remaining: payload.quota_remaining.clone(),
        };
        if let Err(e) = self.notifier.notify(notice).await {
            warn!(key = %key, error = %e, "Failed to enqueue upstream call notice");
        }

        Ok(NormalizedCourseData::from_raw(kind, &cached))
    }
}
