use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::adapters::Notifier;
use crate::error::NotificationError;
use crate::types::UpstreamCallNotice;

/// Hands notices to a background worker so delivery never blocks the caller.
///
/// `notify` only enqueues. The worker forwards each notice to the inner
/// notifier and logs delivery failures. It exits once every sender clone
/// has been dropped and the queue is drained.
#[derive(Clone)]
pub struct QueuedNotifier {
    tx: mpsc::Sender<UpstreamCallNotice>,
}

impl QueuedNotifier {
    /// Starts the worker task. Must be called from within a tokio runtime.
    pub fn spawn(inner: Arc<dyn Notifier>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<UpstreamCallNotice>(capacity.max(1));

        let handle = tokio::spawn(async move {
            info!("Notification worker started");
            while let Some(notice) = rx.recv().await {
                let course_id = notice.course_id.clone();
                let kind = notice.label();
                match inner.notify(notice).await {
                    Ok(()) => debug!(course_id = %course_id, kind, "Notification delivered"),
                    Err(e) => warn!(
                        course_id = %course_id,
                        kind,
                        error = %e,
                        "Notification delivery failed"
                    ),
                }
            }
            info!("Notification worker stopped");
        });

        (Self { tx }, handle)
    }
}

#[async_trait]
impl Notifier for QueuedNotifier {
    async fn notify(&self, notice: UpstreamCallNotice) -> Result<(), NotificationError> {
        self.tx.try_send(notice).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => NotificationError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => NotificationError::QueueClosed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenside_core::DataKind;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for Recorder {
        async fn notify(&self, notice: UpstreamCallNotice) -> Result<(), NotificationError> {
            self.seen.lock().await.push(notice.course_id);
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl Notifier for Failing {
        async fn notify(&self, _notice: UpstreamCallNotice) -> Result<(), NotificationError> {
            Err(NotificationError::SendFailed("smtp down".into()))
        }
    }

    struct Stalled;

    #[async_trait]
    impl Notifier for Stalled {
        async fn notify(&self, _notice: UpstreamCallNotice) -> Result<(), NotificationError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }
    }

    fn notice(id: &str) -> UpstreamCallNotice {
        UpstreamCallNotice {
            course_id: id.into(),
            course_name: "Course".into(),
            kind: DataKind::Coordinates,
            payload: json!({}),
            quota_remaining: None,
        }
    }

    #[tokio::test]
    async fn test_notices_are_forwarded_in_order() {
        let recorder = Arc::new(Recorder::default());
        let (queue, handle) = QueuedNotifier::spawn(recorder.clone(), 8);

        queue.notify(notice("A")).await.unwrap();
        queue.notify(notice("B")).await.unwrap();
        drop(queue);
        handle.await.unwrap();

        assert_eq!(*recorder.seen.lock().await, vec!["A".to_string(), "B".to_string()]);
    }

    #[tokio::test]
    async fn test_inner_failure_does_not_stop_worker() {
        let (queue, handle) = QueuedNotifier::spawn(Arc::new(Failing), 4);

        assert!(queue.notify(notice("A")).await.is_ok());
        assert!(queue.notify(notice("B")).await.is_ok());
        drop(queue);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_full_queue_is_reported() {
        let (queue, handle) = QueuedNotifier::spawn(Arc::new(Stalled), 1);

        // First notice is taken by the worker, second fills the queue.
        queue.notify(notice("A")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        queue.notify(notice("B")).await.unwrap();

        let err = queue.notify(notice("C")).await.unwrap_err();
        assert!(matches!(err, NotificationError::QueueFull));
        handle.abort();
    }
}
