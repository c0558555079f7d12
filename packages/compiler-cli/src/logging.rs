//! Logging
//!
//! Installs the global `tracing` subscriber. Output always goes to stderr so compiled
//! modules on stdout stay clean.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset: warnings, `-v` for debug, `-vv` for trace.
pub fn default_level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

pub fn init_tracing(verbosity: u8) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) => EnvFilter::builder().parse_lossy(directives),
        Err(_) => EnvFilter::new(default_level(verbosity).to_string()),
    };

    // A subscriber may already be installed when embedded in another binary.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
