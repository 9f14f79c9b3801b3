//! Client configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::MinesyncError;

/// Timer periods and logging defaults for a [`Client`](crate::Client).
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```json
/// { "heartbeat_interval_ms": 10000, "log_filter": "minesync=debug" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// How often the queued local position is flushed.
    pub position_interval_ms: u64,
    /// How often the liveness token is sent.
    pub heartbeat_interval_ms: u64,
    /// Random delay (upper bound) before the first heartbeat.
    pub heartbeat_jitter_ms: u64,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            position_interval_ms: 16,
            heartbeat_interval_ms: 30_000,
            heartbeat_jitter_ms: 0,
            log_filter: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Reads a JSON config file.
    ///
    /// # Errors
    /// [`MinesyncError::Io`] if the file cannot be read,
    /// [`MinesyncError::Json`] if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MinesyncError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| MinesyncError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| MinesyncError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Clamps zero periods to one millisecond.
    pub fn validated(mut self) -> Self {
        if self.position_interval_ms == 0 {
            warn!("position_interval_ms is 0, using 1");
            self.position_interval_ms = 1;
        }
        if self.heartbeat_interval_ms == 0 {
            warn!("heartbeat_interval_ms is 0, using 1");
            self.heartbeat_interval_ms = 1;
        }
        self
    }

    pub fn position_interval(&self) -> Duration {
        Duration::from_millis(self.position_interval_ms)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    pub fn heartbeat_jitter(&self) -> Duration {
        Duration::from_millis(self.heartbeat_jitter_ms)
    }
}
