//! Shared plumbing for the `n-serve` binary: error type and logging setup.

pub mod error;

pub use error::CliError;

use tracing_subscriber::EnvFilter;

/// Default filter: keep the terminal quiet unless something goes wrong.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Installs the global tracing subscriber.
///
/// Logs go to stderr so they never interleave with tables or progress lines
/// on stdout.
pub fn init_tracing(filter: Option<&str>) {
    let filter = EnvFilter::try_new(filter.unwrap_or(DEFAULT_LOG_FILTER))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
