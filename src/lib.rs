//! drilldown - Follow JSON navigation specs down to a playable stream
//!
//! A spec document is either a terminal URL, a list to choose from, or a
//! search prompt whose results form a list. The navigator keeps loading and
//! interpreting until it reaches a video, which is saved and played.
//!
//! # Modules
//!
//! - `models` - Spaces, spec documents, MIME classification
//! - `loader` - Local and remote resource loading with MIME sniffing
//! - `query` - Debounced search-as-you-type
//! - `interpreter` - Spec documents to next URL
//! - `navigator` - The resolution loop
//! - `player` - External player handoff
//! - `ui` - TUI prompts

pub mod cli;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod loader;
pub mod logging;
pub mod models;
pub mod navigator;
pub mod player;
pub mod query;
pub mod selector;
pub mod ui;

// Re-export commonly used types
pub use config::{Config, SessionConfig};
pub use error::NavError;
pub use interpreter::{Interpreter, Resolution};
pub use loader::{LoadError, Loader, Resource};
pub use models::{Item, MediaKind, RemoteService, SearchNode, Space, Spec};
pub use navigator::{NavState, Navigator, Outcome};
pub use player::{LocalPlayer, MediaPlayer, PlayerError};
pub use query::{LiveQuery, QueryController, QuerySource};
pub use selector::{SelectionError, Selector};
