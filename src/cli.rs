//! CLI - Command Line Interface for drilldown
//!
//! One positional URL to start from, plus flags that override the config file.
//!
//! # Examples
//!
//! ```bash
//! # Browse specs on disk
//! drilldown specs/index.json
//!
//! # Browse a remote service
//! drilldown --space remote --remote-url https://specs.example.com/ index.json
//!
//! # Use a different player
//! drilldown --player "vlc --fullscreen" zoro://anime/search.json
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::config::{Config, SessionConfig, SpaceKind};
use crate::error::NavError;
use crate::models::RemoteService;
use crate::navigator::Outcome;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments or config
    InvalidArgs = 2,
    /// A resource could not be loaded
    LoadFailed = 3,
    /// A spec document could not be decoded
    DecodeFailed = 4,
    /// The selector failed
    SelectionFailed = 5,
    /// The player failed
    PlaybackFailed = 6,
    /// The user backed out of a prompt
    Aborted = 130,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

impl From<&NavError> for ExitCode {
    fn from(err: &NavError) -> Self {
        match err {
            NavError::Load(_) => ExitCode::LoadFailed,
            NavError::Decode(_) | NavError::Unsupported { .. } => ExitCode::DecodeFailed,
            NavError::Selection(_) => ExitCode::SelectionFailed,
            NavError::Playback(_) => ExitCode::PlaybackFailed,
        }
    }
}

impl From<&Outcome> for ExitCode {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Done | Outcome::Played { .. } => ExitCode::Success,
            Outcome::Aborted => ExitCode::Aborted,
        }
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// drilldown - Follow JSON navigation specs down to something playable
#[derive(Parser, Debug)]
#[command(
    name = "drilldown",
    version,
    about = "Drill down through JSON navigation specs to a playable stream",
    long_about = "Loads a navigation spec from disk or a remote service, shows it as a \
                  list or a live search, and follows your choices until a video is \
                  reached. The video is saved to the work directory and handed to \
                  an external player.",
    after_help = "EXAMPLES:\n\
                  drilldown specs/index.json                         Browse local specs\n\
                  drilldown --space remote index.json                Browse the remote service\n\
                  drilldown zoro://anime/search.json                 Use the service alias\n\
                  drilldown --player \"vlc --fullscreen\" index.json   Pick a player"
)]
pub struct Cli {
    /// URL or path of the first spec
    #[arg(value_name = "URL")]
    pub url: String,

    /// Where relative URLs resolve
    #[arg(long, short = 's', value_enum)]
    pub space: Option<SpaceKind>,

    /// Base URL of the remote spec service
    #[arg(long)]
    pub remote_url: Option<String>,

    /// Name of the remote service, also usable as `<name>://` in URLs
    #[arg(long)]
    pub remote_name: Option<String>,

    /// Player command line; the media path is appended
    #[arg(long, short = 'p')]
    pub player: Option<String>,

    /// Directory for downloaded media and the log file
    #[arg(long, short = 'w')]
    pub work_dir: Option<PathBuf>,

    /// Log MIME types and spec bodies
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Path to config file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Layer these flags over `config` into the session settings
    pub fn session_config(&self, config: &Config) -> anyhow::Result<SessionConfig> {
        let base = config.session();

        let service = RemoteService::new(
            self.remote_name.clone().unwrap_or(base.service.name),
            self.remote_url.clone().unwrap_or(base.service.base_url),
        );
        let space = match self.space {
            Some(kind) => SessionConfig::space_for(kind, &service),
            None => SessionConfig::space_for(config.space.unwrap_or_default(), &service),
        };

        let session = SessionConfig {
            space,
            service,
            player_command: self.player.clone().unwrap_or(base.player_command),
            work_dir: self.work_dir.clone().unwrap_or(base.work_dir),
            verbose: self.verbose || base.verbose,
        };
        session.validate()?;
        Ok(session)
    }
}

// =============================================================================
// Tests
// =============================================================================
