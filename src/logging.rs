//! Logging setup.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! binary's job. `RUST_LOG` takes precedence over the level passed in.

use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` if set, otherwise `sifat=<level>` with
/// everything else at `warn`.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,sifat={}", level)))
}

/// Install a stderr fmt subscriber. Calling it twice is harmless.
pub fn init_logging(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
