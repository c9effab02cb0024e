//! Tracing subscriber setup.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the JSON `fmt` subscriber filtered by `RUST_LOG`.
///
/// Logs go to stderr so command output on stdout stays parseable. A second
/// call, or a subscriber installed elsewhere, is logged and otherwise ignored.
pub fn init() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}
