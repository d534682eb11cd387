use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router, middleware,
    routing::{get, post},
};
use greenside_storage::KeyValueStore;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::{
    config::AppConfig,
    courses::CourseCatalog,
    handlers,
    middleware::{self as app_middleware, ApiSecret},
    resolver::{CacheAsideResolver, ResolverOptions},
    upstream::GolfApiClient,
};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<CacheAsideResolver>,
    pub store: Arc<dyn KeyValueStore>,
    pub courses: Arc<CourseCatalog>,
}

pub struct GreensideServer {
    addr: SocketAddr,
    app: Router,
    notifier_worker: Option<JoinHandle<()>>,
}

pub fn build_app(state: AppState, cfg: &AppConfig) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    let secret = ApiSecret::new(cfg.auth.api_secret.as_deref().unwrap_or_default());

    let protected = Router::new()
        .route("/courses", get(handlers::courses))
        .route("/coordinates/{course_id}", get(handlers::coordinates))
        .route("/info/{course_id}", get(handlers::info))
        .route("/cache/{key}", get(handlers::get_cache))
        .route("/cache", post(handlers::put_cache))
        .route_layer(middleware::from_fn_with_state(
            secret,
            app_middleware::require_bearer,
        ));

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .merge(protected)
        .with_state(state)
        // Middleware stack (order: request id -> trace -> body limit)
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let req_id = req
                        .extensions()
                        .get::<axum::http::HeaderValue>()
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.status_code = tracing::field::Empty,
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>, latency: Duration, span: &tracing::Span| {
                        span.record("http.status_code", res.status().as_u16());
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    /// Wires the store, Golf API client, notifier and course catalog from configuration.
    pub async fn build(self) -> anyhow::Result<GreensideServer> {
        let cfg = &self.config;

        let store = crate::create_store(&cfg.storage).await?;
        let upstream = Arc::new(GolfApiClient::new(
            cfg.upstream.base_url.clone(),
            cfg.upstream.timeout(),
        )?);
        let (notifier, notifier_worker) = crate::create_notifier(&cfg.notifications);
        let courses = Arc::new(CourseCatalog::from_path(&cfg.courses.path));

        if cfg.upstream.api_token.is_none() {
            tracing::warn!("upstream.api_token is not set; cache misses will fail");
        }

        let resolver = CacheAsideResolver::new(
            store.clone(),
            upstream,
            notifier,
            courses.clone(),
            ResolverOptions {
                credential: cfg.upstream.api_token.clone(),
                refetch_on_corrupt: cfg.cache.refetch_on_corrupt,
            },
        );

        tracing::info!(
            backend = store.backend_name(),
            courses = courses.len(),
            "Application state initialized"
        );

        let state = AppState {
            resolver: Arc::new(resolver),
            store,
            courses,
        };

        Ok(GreensideServer {
            addr: self.addr,
            app: build_app(state, cfg),
            notifier_worker: Some(notifier_worker),
        })
    }
}

impl GreensideServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        // The router owned the last queue sender; give the worker time to drain
        if let Some(worker) = self.notifier_worker
            && tokio::time::timeout(Duration::from_secs(10), worker).await.is_err()
        {
            tracing::warn!("notification worker did not drain before shutdown");
        }
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
