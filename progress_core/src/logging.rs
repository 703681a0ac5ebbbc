//! Diagnostics for the `progress` binary.
//!
//! Everything goes to stderr. Stdout is reserved for dashboard text,
//! `--json` documents and export confirmations.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Level used when `RUST_LOG` is unset
pub const DEFAULT_LEVEL: &str = "warn";

/// Install the stderr subscriber at [`DEFAULT_LEVEL`]
///
/// Record-store warnings (e.g. a duplicate date in a hand-edited file)
/// still show up. Use `RUST_LOG=debug` to trace loads, saves and metric
/// calculations.
pub fn init() {
    init_with_level(DEFAULT_LEVEL)
}

/// Install the stderr subscriber, falling back to `default_level` when
/// `RUST_LOG` is unset or unparseable
pub fn init_with_level(default_level: &str) {
    tracing_subscriber::registry()
        .with(filter_or(default_level))
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn filter_or(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Route debug output through the test harness; safe to call repeatedly
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
