//! Logging setup and the failure-reporting collaborator used by list panels.

use crate::error::ChatdeckError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level` when it is set. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
pub fn init_logging(level: &str) {
    let default_filter = format!("chatdeck={level},eframe=warn,egui=warn");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init();

    if result.is_ok() {
        tracing::debug!(level, "logging initialized");
    }
}

/// Receives failures that a component recovers from locally.
pub trait FailureLog {
    /// Report `error`, tagged with the component's `context` label.
    fn log_failure(&self, context: &str, error: &ChatdeckError);
}

/// [`FailureLog`] that forwards to `tracing::error!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFailureLog;

impl FailureLog for TracingFailureLog {
    fn log_failure(&self, context: &str, error: &ChatdeckError) {
        tracing::error!(context, %error, "Failed to delete item");
    }
}
