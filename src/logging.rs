//! Logging setup for the binary.
//!
//! Logs go to stderr so JSON on stdout stays machine-readable.

use color_eyre::eyre::{WrapErr, eyre};
use tracing_subscriber::EnvFilter;

/// Environment variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "DSQR_LOG";

/// Install the global subscriber.
///
/// Filter precedence: `DSQR_LOG`, then `RUST_LOG`, then `debug` when
/// `verbose` is set and `warn` otherwise.
pub fn init(verbose: bool) -> color_eyre::Result<()> {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(fallback))
        .wrap_err("build log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| eyre!("initialize tracing subscriber: {err}"))?;

    Ok(())
}
