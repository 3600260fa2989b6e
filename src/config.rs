//! Configuration management for drilldown
//!
//! Handles config file loading and the immutable session settings built from it.
//! Config is stored at ~/.config/drilldown/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{RemoteService, Space};
use crate::player::DEFAULT_PLAYER;

/// Work directory for saved media and the log file
pub const DEFAULT_WORK_DIR: &str = "./tmp";

/// Which space relative URLs resolve in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpaceKind {
    #[default]
    Local,
    Remote,
}

/// Settings read from the config file; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default space (local, remote)
    pub space: Option<SpaceKind>,
    /// Base URL of the remote spec service
    pub remote_url: Option<String>,
    /// Service name, doubles as a URL scheme alias
    pub remote_name: Option<String>,
    /// Player command line, the media path is appended
    pub player: Option<String>,
    /// Where media and logs are written
    pub work_dir: Option<PathBuf>,
    /// Debug logging
    pub verbose: Option<bool>,
}

impl Config {
    /// Get config file path (~/.config/drilldown/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("drilldown").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Load config from an explicit path; a missing or malformed file is an error
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Session settings from this file over the built-in defaults
    pub fn session(&self) -> SessionConfig {
        let defaults = SessionConfig::default();
        let service = RemoteService::new(
            self.remote_name.clone().unwrap_or(defaults.service.name),
            self.remote_url.clone().unwrap_or(defaults.service.base_url),
        );

        SessionConfig {
            space: SessionConfig::space_for(self.space.unwrap_or_default(), &service),
            service,
            player_command: self.player.clone().unwrap_or(defaults.player_command),
            work_dir: self.work_dir.clone().unwrap_or(defaults.work_dir),
            verbose: self.verbose.unwrap_or(defaults.verbose),
        }
    }
}

/// Immutable settings for one navigation session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub space: Space,
    /// Known to the loader in every space for alias URLs
    pub service: RemoteService,
    pub player_command: String,
    pub work_dir: PathBuf,
    pub verbose: bool,
}

impl SessionConfig {
    pub fn space_for(kind: SpaceKind, service: &RemoteService) -> Space {
        match kind {
            SpaceKind::Local => Space::Local,
            SpaceKind::Remote => Space::Remote(service.clone()),
        }
    }

    /// Reject settings that cannot work before anything is loaded
    pub fn validate(&self) -> Result<()> {
        if self.service.name.trim().is_empty() {
            anyhow::bail!("Remote service name must not be empty");
        }
        reqwest::Url::parse(&self.service.base_url)
            .with_context(|| format!("Invalid remote URL '{}'", self.service.base_url))?;
        if self.player_command.trim().is_empty() {
            anyhow::bail!("Player command must not be empty");
        }
        Ok(())
    }

    /// Path of the session log file
    pub fn log_path(&self) -> PathBuf {
        self.work_dir.join("drilldown.log")
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            space: Space::Local,
            service: RemoteService::default(),
            player_command: DEFAULT_PLAYER.to_string(),
            work_dir: PathBuf::from(DEFAULT_WORK_DIR),
            verbose: false,
        }
    }
}
