//! Tracing subscriber setup.
//!
//! Logs go to stderr so that stdout stays reserved for command output
//! (search listings, JSON responses, exports). `RUST_LOG` overrides the
//! configured `[logging] level`.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global `fmt` subscriber. Safe to call more than once; later
/// calls are no-ops.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
