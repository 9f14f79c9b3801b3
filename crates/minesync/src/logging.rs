//! Log subscriber setup.

use tracing_subscriber::{EnvFilter, fmt};

use crate::MinesyncError;

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set. Calling this twice is
/// harmless: the second call leaves the first subscriber in place.
///
/// # Errors
/// [`MinesyncError::Logging`] if `default_filter` is not a valid filter.
pub fn init(default_filter: &str) -> Result<(), MinesyncError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .map_err(|e| MinesyncError::Logging(format!("bad filter {default_filter:?}: {e}")))?,
    };

    if fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init().is_err() {
        tracing::debug!("log subscriber already installed");
    }
    Ok(())
}
