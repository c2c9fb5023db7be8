//! Tracing setup for hosts embedding the engine.

use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Initializes a global tracing subscriber honoring `RUST_LOG`.
///
/// Falls back to `level` when the environment sets no filter. Safe to call
/// more than once; later calls are no-ops.
pub fn init_tracing(level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

/// Creates the span wrapping one discovery run.
#[must_use]
pub fn discovery_span(run_id: &str, title: &str) -> tracing::Span {
    tracing::info_span!("related_discovery", run_id = %run_id, title = %title)
}
