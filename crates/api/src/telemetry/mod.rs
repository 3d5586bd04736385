//! Structured logging and metrics.
//!
//! Logs go through `tracing`; development and test builds print the
//! human-readable format, production prints one JSON object per line.

pub mod metrics;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::Config;

pub use self::metrics::HttpMetrics;

/// Value of the `service` field attached to request spans and lifecycle events.
pub const SERVICE_NAME: &str = "sit753-app";

/// Installs the global tracing subscriber and the panic hook.
///
/// Fails if a subscriber is already installed.
pub fn init(config: &Config) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if config.environment.json_logs() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()?;
    }

    install_panic_hook();
    Ok(())
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        tracing::error!(
            service = SERVICE_NAME,
            panic = %info,
            %backtrace,
            "unhandled panic"
        );
    }));
}
