pub mod email;
pub mod log;

use async_trait::async_trait;

use crate::error::NotificationError;
use crate::types::UpstreamCallNotice;

/// Sink informed whenever a cache miss consumed an upstream call.
///
/// Delivery is best-effort: callers log a returned error and carry on.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver (or hand off) a notice
    async fn notify(&self, notice: UpstreamCallNotice) -> Result<(), NotificationError>;
}

pub use email::{EmailConfig, EmailNotifier};
pub use log::LogNotifier;
