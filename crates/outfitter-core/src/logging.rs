//! Structured logging setup.
//!
//! Library crates only emit `tracing` events; installing a subscriber is
//! left to the process that embeds them. [`init`] installs the standard
//! formatter with an [`EnvFilter`]: `RUST_LOG` wins when set, otherwise the
//! configured level applies.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global `tracing` subscriber.
///
/// Returns `false` if a subscriber was already installed, in which case the
/// existing one is left in place. Safe to call more than once.
pub fn init(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(level = config.level.as_str(), "Logging initialized");
    }
    installed
}
