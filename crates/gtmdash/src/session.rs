#![forbid(unsafe_code)]

//! Per-session context.
//!
//! A [`Session`] is built once at startup and passed by reference to every
//! view that needs the user or the configuration. There is no global.

use gtmdash_layout::{PaneBounds, PaneShare, PaneSpec, WorkspaceLayout};
use gtmdash_runtime::{DashboardConfig, FetchOptions};
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub workspace: String,
}

impl UserProfile {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        workspace: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            workspace: workspace.into(),
        }
    }

    /// First letters of the first two name words, for avatar badges.
    #[must_use]
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    user: UserProfile,
    config: DashboardConfig,
}

impl Session {
    /// Validates `config` up front so views never see a bad one.
    pub fn new(user: UserProfile, config: DashboardConfig) -> Result<Self> {
        let config = config.validated()?;
        tracing::debug!(
            target: "gtmdash.workspace",
            workspace = %user.workspace,
            poll_interval_ms = config.poll_interval_ms,
            "session created"
        );
        Ok(Self { user, config })
    }

    #[cfg(feature = "config-files")]
    pub fn from_config_file(user: UserProfile, path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            DashboardConfig::from_json_file(path)?
        } else {
            DashboardConfig::from_toml_file(path)?
        };
        Self::new(user, config)
    }

    #[must_use]
    pub const fn user(&self) -> &UserProfile {
        &self.user
    }

    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    #[must_use]
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: self.config.request_timeout(),
            ..FetchOptions::default()
        }
    }

    /// Sidebar and chat boundaries sized from the configuration.
    pub fn workspace_layout(&self) -> Result<WorkspaceLayout> {
        let config = &self.config;
        let collapsed = PaneShare::from_percent(config.collapsed_share)?;
        let sidebar = PaneSpec::sidebar()
            .with_bounds(PaneBounds::from_percent(
                config.sidebar_min_share,
                config.sidebar_max_share,
            )?)
            .with_default_share(PaneShare::from_percent(config.sidebar_default_share)?)
            .with_collapsed_share(collapsed);
        let chat = PaneSpec::chat()
            .with_bounds(PaneBounds::from_percent(config.min_share, config.max_share)?)
            .with_default_share(PaneShare::from_percent(config.default_share)?)
            .with_collapsed_share(collapsed);
        Ok(WorkspaceLayout::standard(sidebar, chat)?)
    }
}
