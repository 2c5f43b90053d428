//! Logging setup.
//!
//! Diagnostics go to stderr through `tracing`, so stdout carries only the
//! completion line. `RUST_LOG` overrides the verbosity-derived filter.

use tracing_subscriber::EnvFilter;

/// Filter directive for a verbosity level (`-v` count).
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "jacketcreator=warn",
        1 => "jacketcreator=info",
        2 => "jacketcreator=debug",
        _ => "jacketcreator=trace",
    }
}

/// Install the global stderr subscriber.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
