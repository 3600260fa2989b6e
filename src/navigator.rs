//! Navigation driver
//!
//! Loads a URL, plays it if it is media, otherwise interprets it as a spec
//! and follows the URL it resolves to. Strictly one step at a time.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::SessionConfig;
use crate::error::NavError;
use crate::interpreter::{Interpreter, Resolution};
use crate::loader::Loader;
use crate::models::{DecodeError, MediaKind};
use crate::player::MediaPlayer;
use crate::selector::Selector;

/// Where the driver is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavState {
    Resolving(String),
    PlayingMedia(PathBuf),
    Done,
    /// The user dismissed a prompt
    Aborted,
    Failed,
}

impl NavState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, NavState::Resolving(_))
    }
}

/// How a successful session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Played { path: PathBuf },
    Aborted,
}

pub struct Navigator<S, P> {
    loader: Loader,
    interpreter: Interpreter<S>,
    player: P,
    work_dir: PathBuf,
    state: NavState,
}

impl<S: Selector, P: MediaPlayer> Navigator<S, P> {
    pub fn new(loader: Loader, selector: S, player: P, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            loader,
            interpreter: Interpreter::new(selector),
            player,
            work_dir: work_dir.into(),
            state: NavState::Resolving(String::new()),
        }
    }

    pub fn from_config(config: &SessionConfig, selector: S, player: P) -> Self {
        Self::new(
            Loader::from_config(config),
            selector,
            player,
            config.work_dir.clone(),
        )
    }

    /// Override the search debounce window
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.interpreter = self.interpreter.with_debounce(debounce);
        self
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn selector(&self) -> &S {
        self.interpreter.selector()
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Follow the chain from `start` until media plays, the chain ends,
    /// or the user backs out. Any error leaves the navigator `Failed`.
    pub async fn run(&mut self, start: &str) -> Result<Outcome, NavError> {
        let result = self.drive(start.to_string()).await;
        if let Err(e) = &result {
            log::error!("Navigation failed: {}", e);
            self.state = NavState::Failed;
        }
        result
    }

    async fn drive(&mut self, mut url: String) -> Result<Outcome, NavError> {
        loop {
            if url.is_empty() {
                log::info!("Navigation done");
                self.state = NavState::Done;
                return Ok(Outcome::Done);
            }

            self.state = NavState::Resolving(url.clone());
            let resource = self.loader.load(&url).await?;

            match resource.kind() {
                MediaKind::Video => {
                    let path = resource.save(&self.work_dir).await?;
                    self.state = NavState::PlayingMedia(path.clone());
                    self.player.play(&path).await?;
                    return Ok(Outcome::Played { path });
                }
                MediaKind::Json => {
                    let body = resource
                        .buffer()
                        .ok_or_else(|| DecodeError::NotJson(resource.mime().to_string()))?;

                    match self.interpreter.interpret(&self.loader, body)? {
                        Resolution::Next(next) => url = next,
                        Resolution::Dismissed => {
                            log::info!("Prompt dismissed at {}", url);
                            self.state = NavState::Aborted;
                            return Ok(Outcome::Aborted);
                        }
                    }
                }
                MediaKind::Other => {
                    return Err(NavError::Unsupported {
                        url,
                        mime: resource.mime().to_string(),
                    });
                }
            }
        }
    }
}
