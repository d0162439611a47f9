// src/logging.rs
// =============================================================================
// Process-wide logging setup.
//
// The analyzer only emits `tracing` events; this is where the binary decides
// what to do with them.
//
// Environment variables:
// - LOG_LEVEL: DEBUG, INFO, WARN or ERROR (default INFO, case-insensitive)
// - RUST_LOG: full tracing filter syntax, wins over LOG_LEVEL when set
// - ENV: "development" or "dev" gives colored text, anything else JSON lines
//
// Logs go to stderr so `--json` output on stdout stays machine-readable.
// =============================================================================

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

// Maps LOG_LEVEL values onto tracing levels
fn level_from_env(value: Option<&str>) -> &'static str {
    match value.map(|v| v.to_ascii_uppercase()).as_deref() {
        Some("DEBUG") => "debug",
        Some("WARN") => "warn",
        Some("ERROR") | Some("FATAL") => "error",
        _ => "info",
    }
}

fn is_development(value: Option<&str>) -> bool {
    matches!(value, Some("development") | Some("dev"))
}

// Installs the global tracing subscriber
//
// Call this once, at the very start of main().
pub fn init() -> Result<()> {
    let level = level_from_env(std::env::var("LOG_LEVEL").ok().as_deref());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if is_development(std::env::var("ENV").ok().as_deref()) {
        builder.with_ansi(true).try_init()
    } else {
        builder.json().try_init()
    };

    installed.map_err(|e| anyhow!("failed to install logger: {}", e))
}
