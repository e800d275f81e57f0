//! Structured logging initialization.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (from the config
/// file) applies. Must be called at most once per process.
pub fn init(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
