use async_trait::async_trait;

use super::Notifier;
use crate::error::NotificationError;
use crate::types::UpstreamCallNotice;

/// Writes notices to the log. Used when e-mail delivery is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notice: UpstreamCallNotice) -> Result<(), NotificationError> {
        tracing::info!(
            course_id = %notice.course_id,
            course_name = %notice.course_name,
            kind = notice.label(),
            quota_remaining = notice.quota_remaining.as_deref().unwrap_or("unknown"),
            "New upstream course data fetched"
        );
        Ok(())
    }
}
