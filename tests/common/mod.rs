//! Test doubles shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use drilldown::loader::LoadError;
use drilldown::models::Item;
use drilldown::player::{MediaPlayer, PlayerError};
use drilldown::query::{LiveQuery, QueryError, QuerySource};
use drilldown::selector::{SelectionError, Selector};

/// Selector that answers from a script and remembers what it was shown
#[derive(Debug, Default)]
pub struct ScriptedSelector {
    /// Answers for list prompts, in order; `None` dismisses
    pub choices: VecDeque<Option<usize>>,
    /// Text typed into search prompts, in order; `None` dismisses
    pub searches: VecDeque<Option<(String, usize)>>,
    /// Every list shown by a list prompt
    pub shown: Vec<Vec<Item>>,
    /// Every result list rendered by a search prompt
    pub rendered: Vec<Vec<Item>>,
}

impl ScriptedSelector {
    pub fn choosing(choices: impl IntoIterator<Item = Option<usize>>) -> Self {
        Self {
            choices: choices.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn searching(text: &str, pick: usize) -> Self {
        Self {
            searches: VecDeque::from([Some((text.to_string(), pick))]),
            ..Self::default()
        }
    }

    pub fn then_choosing(mut self, choices: impl IntoIterator<Item = Option<usize>>) -> Self {
        self.choices.extend(choices);
        self
    }
}

impl Selector for ScriptedSelector {
    fn select(&mut self, items: &[Item]) -> Result<Option<usize>, SelectionError> {
        self.shown.push(items.to_vec());
        Ok(self.choices.pop_front().flatten())
    }

    /// Types the whole text at once and waits for results. Needs a
    /// multi-thread runtime because it blocks the calling thread.
    fn search(&mut self, query: &mut dyn LiveQuery) -> Result<Option<Item>, SelectionError> {
        let Some((text, pick)) = self.searches.pop_front().flatten() else {
            return Ok(None);
        };
        query.on_text_changed(&text);

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(items) = query.poll()? {
                self.rendered.push(items.clone());
                return Ok(items.get(pick).cloned());
            }
            assert!(
                std::time::Instant::now() < deadline,
                "search results never arrived"
            );
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}

/// Player that records what it was asked to play
#[derive(Debug, Clone, Default)]
pub struct RecordingPlayer {
    /// Path and file contents at the moment playback started
    pub played: Arc<Mutex<Vec<(PathBuf, Vec<u8>)>>>,
    pub fail: bool,
}

impl RecordingPlayer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn played(&self) -> Vec<(PathBuf, Vec<u8>)> {
        self.played.lock().unwrap().clone()
    }
}

impl MediaPlayer for RecordingPlayer {
    fn play(&self, path: &Path) -> impl Future<Output = Result<(), PlayerError>> + Send {
        let path = path.to_path_buf();
        let played = self.played.clone();
        let fail = self.fail;

        async move {
            let content = tokio::fs::read(&path).await.unwrap_or_default();
            played.lock().unwrap().push((path, content));
            if fail {
                Err(PlayerError::NotFound("fake-player".into()))
            } else {
                Ok(())
            }
        }
    }
}

/// Query source answering every query with one hit; URLs containing
/// "fail" fail to load
#[derive(Debug, Clone, Default)]
pub struct Catalog;

impl QuerySource for Catalog {
    fn fetch(&self, url: String) -> impl Future<Output = Result<Vec<Item>, QueryError>> + Send {
        async move {
            if url.contains("fail") {
                return Err(LoadError::InvalidUrl {
                    url,
                    reason: "unreachable".into(),
                }.into());
            }
            Ok(vec![
                Item::new(format!("hit for {url}"), format!("{url}.json")),
                Item::new("other", "other.json"),
            ])
        }
    }
}

/// Smallest FLV header, enough for magic-byte detection
pub const FLV: &[u8] = &[
    0x46, 0x4C, 0x56, 0x01, 0x05, 0x00, 0x00, 0x00, 0x09, 0x00, 0x00, 0x00, 0x00,
];
