#![forbid(unsafe_code)]

//! Dashboard configuration.
//!
//! Every field has a default, so a partial file only overrides what it
//! names:
//!
//! ```toml
//! poll_interval_ms = 60000
//! min_share = 25.0
//! ```
//!
//! File loading (TOML and JSON) is behind the `config-files` feature.

#[cfg(feature = "config-files")]
use std::path::Path;

use serde::{Deserialize, Serialize};
use web_time::Duration;

/// Tunables for polling, pane clamping, and request timeouts.
///
/// Shares are percentages of the track they split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub poll_interval_ms: u64,
    /// Lower bound of the main content share at the chat boundary.
    pub min_share: f64,
    pub max_share: f64,
    pub default_share: f64,
    pub sidebar_default_share: f64,
    pub sidebar_min_share: f64,
    pub sidebar_max_share: f64,
    /// Share reported by a collapsed pane.
    pub collapsed_share: f64,
    /// `None` disables the per-request timeout.
    pub request_timeout_ms: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 30_000,
            min_share: 30.0,
            max_share: 80.0,
            default_share: 66.67,
            sidebar_default_share: 18.0,
            sidebar_min_share: 12.0,
            sidebar_max_share: 30.0,
            collapsed_share: 4.0,
            request_timeout_ms: Some(15_000),
        }
    }
}

impl DashboardConfig {
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    #[cfg(feature = "config-files")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Every problem found. Empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.poll_interval_ms == 0 {
            errors.push("poll_interval_ms must be > 0".into());
        }
        if self.request_timeout_ms == Some(0) {
            errors.push("request_timeout_ms must be > 0 when set".into());
        }

        for (name, value) in [
            ("min_share", self.min_share),
            ("max_share", self.max_share),
            ("default_share", self.default_share),
            ("sidebar_default_share", self.sidebar_default_share),
            ("sidebar_min_share", self.sidebar_min_share),
            ("sidebar_max_share", self.sidebar_max_share),
            ("collapsed_share", self.collapsed_share),
        ] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                errors.push(format!("{name} must be within 0..=100, got {value}"));
            }
        }

        check_range(
            &mut errors,
            ("min_share", self.min_share),
            ("default_share", self.default_share),
            ("max_share", self.max_share),
        );
        check_range(
            &mut errors,
            ("sidebar_min_share", self.sidebar_min_share),
            ("sidebar_default_share", self.sidebar_default_share),
            ("sidebar_max_share", self.sidebar_max_share),
        );

        errors
    }

    /// Validate, folding problems into one error.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

fn check_range(errors: &mut Vec<String>, min: (&str, f64), default: (&str, f64), max: (&str, f64)) {
    if min.1 > max.1 {
        errors.push(format!("{} ({}) exceeds {} ({})", min.0, min.1, max.0, max.1));
    } else if !(min.1..=max.1).contains(&default.1) {
        errors.push(format!(
            "{} ({}) must lie within [{}, {}]",
            default.0, default.1, min.1, max.1
        ));
    }
}

/// Configuration load/validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    #[cfg(feature = "config-files")]
    Toml(toml::de::Error),
    #[cfg(feature = "config-files")]
    Json(serde_json::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "invalid configuration: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
