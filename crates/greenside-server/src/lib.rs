pub mod config;
pub mod courses;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod resolver;
pub mod server;
pub mod upstream;

pub use config::{
    AppConfig, AuthConfig, CacheConfig, CoursesConfig, LoggingConfig, NotificationsConfig,
    ServerConfig, StorageBackend, StorageConfig, UpstreamConfig,
};
pub use courses::{Course, CourseCatalog};
pub use error::{ApiError, ResolveError};
pub use observability::init_tracing;
pub use resolver::{CacheAsideResolver, NormalizedCourseData, ResolverOptions};
pub use server::{AppState, GreensideServer, ServerBuilder, build_app};
pub use upstream::{GolfApiClient, UpstreamClient, UpstreamError, UpstreamPayload};

use std::sync::Arc;

use greenside_notifications::{EmailNotifier, LogNotifier, Notifier, QueuedNotifier};
use greenside_storage::{InMemoryStore, KeyValueStore};
use tokio::task::JoinHandle;

/// Create the cache store selected by configuration.
///
/// ## Backends
///
/// - **memory**: process-local DashMap, lost on restart
/// - **postgres**: shared table, pool created once here and owned by the store
pub async fn create_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory cache store");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let pg = config.postgres.to_store_config();
            tracing::info!(table = %pg.table, "Connecting to PostgreSQL cache store");
            let store = greenside_db_postgres::create_store(pg).await?;
            Ok(store)
        }
    }
}

/// Create the notifier chain: a background queue in front of e-mail (or log) delivery.
///
/// If e-mail is enabled but misconfigured, the error is logged and notices
/// are written to the log instead, so the gateway still starts.
pub fn create_notifier(config: &NotificationsConfig) -> (Arc<dyn Notifier>, JoinHandle<()>) {
    let delivery: Arc<dyn Notifier> = if config.enabled {
        match EmailNotifier::new(&config.email) {
            Ok(email) => {
                tracing::info!(smtp_host = %config.email.smtp_host, "Email notifications enabled");
                Arc::new(email)
            }
            Err(e) => {
                tracing::error!(error = %e, "Email notifier unavailable, logging notices instead");
                Arc::new(LogNotifier)
            }
        }
    } else {
        tracing::info!("Email notifications disabled, logging notices instead");
        Arc::new(LogNotifier)
    };

    let (queue, handle) = QueuedNotifier::spawn(delivery, config.queue_capacity);
    (Arc::new(queue), handle)
}
