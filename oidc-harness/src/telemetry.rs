//! Console tracing setup for the harness binaries.

use tracing_subscriber::EnvFilter;

/// Initializes a console subscriber honoring `RUST_LOG`, defaulting to
/// `info`. Events go to stderr so the `>`-prefixed report lines own
/// stdout.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
