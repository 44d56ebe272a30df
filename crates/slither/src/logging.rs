//! Diagnostics for the client process.
//!
//! stdout belongs to the host: it must carry nothing but commands. Every log
//! line therefore goes to stderr.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// Reads `RUST_LOG`, defaulting to `info`. Output is compact and on stderr.
///
/// ```bash
/// RUST_LOG=slither=debug,slither_protocol=trace reference-snake < game.txt
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
