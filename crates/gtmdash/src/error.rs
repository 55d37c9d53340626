#![forbid(unsafe_code)]

//! Top-level error type aggregating every subsystem error.

use std::fmt;

use gtmdash_layout::{PaneLayoutError, WorkspaceError};
use gtmdash_runtime::{ConfigError, FetchError};

#[derive(Debug)]
pub enum Error {
    Config(ConfigError),
    Layout(PaneLayoutError),
    Workspace(WorkspaceError),
    Fetch(FetchError),
    /// Subscriber installation failed (already installed, bad filter).
    Logging(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration: {err}"),
            Self::Layout(err) => write!(f, "layout: {err}"),
            Self::Workspace(err) => write!(f, "workspace: {err}"),
            Self::Fetch(err) => write!(f, "fetch: {err}"),
            Self::Logging(msg) => write!(f, "logging: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Layout(err) => Some(err),
            Self::Workspace(err) => Some(err),
            Self::Fetch(err) => Some(err),
            Self::Logging(_) => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<PaneLayoutError> for Error {
    fn from(err: PaneLayoutError) -> Self {
        Self::Layout(err)
    }
}

impl From<WorkspaceError> for Error {
    fn from(err: WorkspaceError) -> Self {
        Self::Workspace(err)
    }
}

impl From<FetchError> for Error {
    fn from(err: FetchError) -> Self {
        Self::Fetch(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
