use greenside_core::DataKind;
use serde::Serialize;
use serde_json::Value;

/// Placeholder used when a course is missing from the catalog.
pub const UNKNOWN_COURSE_NAME: &str = "Unknown Course";

/// Emitted whenever a cache miss consumed an upstream API call.
#[derive(Debug, Clone, Serialize)]
pub struct UpstreamCallNotice {
    pub course_id: String,
    pub course_name: String,
    pub kind: DataKind,

    /// Raw upstream payload, exactly as persisted
    pub payload: Value,

    /// Remaining provider quota, when the provider reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_remaining: Option<String>,
}

impl UpstreamCallNotice {
    /// "POI" or "Info".
    pub fn label(&self) -> &'static str {
        self.kind.notice_label()
    }
}
