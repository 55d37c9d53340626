#![forbid(unsafe_code)]

//! JSON log output for hosts that want it.
//!
//! Events are emitted under the `gtmdash.fetch`, `gtmdash.pane`,
//! `gtmdash.annotation`, and `gtmdash.workspace` targets. The filter comes
//! from `GTMDASH_LOG` (e.g. `GTMDASH_LOG=gtmdash.fetch=debug`) and falls back
//! to `info`.

use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "GTMDASH_LOG";

/// Filter from `GTMDASH_LOG`, or `info` if unset or unparsable.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global JSON subscriber. Fails if one is already installed.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_current_span(false)
        .try_init()
        .map_err(|err| Error::Logging(err.to_string()))
}
