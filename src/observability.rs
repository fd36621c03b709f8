//! Structured logging setup.
//!
//! The gateway itself only emits `tracing` events; embedding applications
//! call [`init_logging`] once to install a subscriber. Level comes from
//! `RUST_LOG` when set, otherwise from the given default.

use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber. Safe to call more than once; later
/// calls are no-ops.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
