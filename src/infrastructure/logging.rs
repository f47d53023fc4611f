//! Logging setup for the pyhygiene binaries.
//! Records go to stderr so stdout stays reserved for reports.

use anyhow::Result;
use env_logger::{Builder, Env};

/// Install the global logger. Silent unless `verbose` is set or `RUST_LOG` says otherwise.
pub fn init_logging(verbose: bool) -> Result<()> {
    let default_filter = if verbose { "debug" } else { "off" };
    Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init()?;

    log::debug!("logging initialised (verbose: {})", verbose);
    Ok(())
}
