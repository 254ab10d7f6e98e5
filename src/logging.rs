//! Diagnostic tracing for the interpreter.
//!
//! The library only emits events: `debug` once per prepared program and per
//! run, `trace` once per executed instruction. Program output never goes
//! through here.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize a tracing subscriber writing compact lines to stderr.
///
/// Reads `RUST_LOG`; falls back to `default_directive` when it is unset or
/// invalid.
///
/// # Example
/// ```bash
/// RUST_LOG=bf=trace bf run --input A ",."
/// ```
pub fn init(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
