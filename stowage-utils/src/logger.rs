//! Process-wide log output.
//!
//! Library crates log through the `log` facade; this installs a `tracing`
//! subscriber that also captures those records.

use std::error::Error;

use tracing_subscriber::EnvFilter;

/// The filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`. Returns an error if a
/// global subscriber or `log` logger was already installed.
pub fn init(default_filter: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()?;

    log::debug!("Logger initialized");
    Ok(())
}
