//! External player handoff
//!
//! Runs a configured command line (e.g. `mpv --fs`) with the saved media
//! file appended, and waits for it to exit.

use std::ffi::OsString;
use std::future::Future;
use std::path::Path;
use std::process::{ExitStatus, Stdio};

use thiserror::Error;
use tokio::process::Command;

/// Player command used when none is configured
pub const DEFAULT_PLAYER: &str = "mpv";

/// Errors from local player operations
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("player command is empty")]
    EmptyCommand,
    #[error("player '{0}' not found. Install it first.")]
    NotFound(String),
    #[error("failed to start player: {0}")]
    StartFailed(#[from] std::io::Error),
    #[error("player exited with {0}")]
    ExitStatus(ExitStatus),
}

/// Something that can play a local media file to completion
pub trait MediaPlayer {
    fn play(&self, path: &Path) -> impl Future<Output = Result<(), PlayerError>> + Send;
}

/// Player process started from a command template
#[derive(Debug, Clone)]
pub struct LocalPlayer {
    command: String,
}

impl LocalPlayer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Program and arguments for playing `path`
    pub fn command_line(&self, path: &Path) -> Result<(String, Vec<OsString>), PlayerError> {
        let mut parts = self.command.split_whitespace();
        let program = parts.next().ok_or(PlayerError::EmptyCommand)?;

        let mut args: Vec<OsString> = parts.map(OsString::from).collect();
        args.push(path.as_os_str().to_os_string());
        Ok((program.to_string(), args))
    }

    /// Check if the player binary is on PATH
    pub async fn is_available(&self) -> bool {
        let Some(program) = self.command.split_whitespace().next() else {
            return false;
        };

        if program.contains(std::path::MAIN_SEPARATOR) {
            return Path::new(program).exists();
        }

        Command::new("which")
            .arg(program)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl Default for LocalPlayer {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYER)
    }
}

impl MediaPlayer for LocalPlayer {
    fn play(&self, path: &Path) -> impl Future<Output = Result<(), PlayerError>> + Send {
        let command_line = self.command_line(path);

        async move {
            let (program, args) = command_line?;
            log::info!("Starting player: {} {:?}", program, args);

            let mut cmd = Command::new(&program);
            cmd.args(&args);
            cmd.stdout(Stdio::null());
            cmd.stderr(Stdio::null());

            let status = cmd.status().await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PlayerError::NotFound(program.clone())
                } else {
                    PlayerError::StartFailed(e)
                }
            })?;

            if status.success() {
                Ok(())
            } else {
                Err(PlayerError::ExitStatus(status))
            }
        }
    }
}
