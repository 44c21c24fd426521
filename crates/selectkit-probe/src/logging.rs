//! Test logging bootstrap
//!
//! Installs a `tracing` fmt subscriber filtered by `RUST_LOG`, falling back
//! to `warn`. Safe to call from every test: only the first call installs.

use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "warn";

/// Installs the test subscriber; returns false if one was already set
pub fn init_test_logging() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_test_writer()
        .try_init()
        .is_ok()
}
