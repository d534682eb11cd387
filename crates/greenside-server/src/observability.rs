//! Process-wide tracing subscriber.
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global subscriber at the configured level.
///
/// A valid `RUST_LOG` takes precedence over `level`. Calling this twice is a no-op.
pub fn init_tracing(level: &str) {
    let filter = resolve_filter(std::env::var("RUST_LOG").ok().as_deref(), level);
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init();
}

fn resolve_filter(rust_log: Option<&str>, level: &str) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
