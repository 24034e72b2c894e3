//! Observability infrastructure for Accord.
//!
//! Structured logging with consistent spans. Every event invocation runs
//! inside a span carrying the event source and signal kind, so reports from
//! the correlator and reconciler can be tied back to the upstream delivery.

use std::sync::Once;
use tracing::Span;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Clone, Copy, Default)]
pub enum LogFormat {
    /// JSON structured logs (for production).
    Json,
    /// Pretty-printed logs (for development).
    #[default]
    Pretty,
}

/// Initializes the logging subsystem.
///
/// Call once at application startup. Safe to call multiple times;
/// subsequent calls are no-ops.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Controls log levels (e.g., `info`, `accord_lifecycle=debug`)
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        match format {
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().json())
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().pretty())
                    .init();
            }
        }
    });
}

/// Creates a span for processing one lifecycle event.
///
/// # Example
///
/// ```rust
/// use accord_core::observability::lifecycle_span;
///
/// let span = lifecycle_span("process", "aws.controltower");
/// let _guard = span.enter();
/// // ... normalize, correlate, reconcile
/// ```
#[must_use]
pub fn lifecycle_span(operation: &str, source: &str) -> Span {
    tracing::info_span!(
        "lifecycle",
        op = operation,
        source = source,
    )
}
