//! Terminal UI components
//!
//! Built with ratatui. Keyboard-first navigation throughout.

pub mod list;
pub mod search;
pub mod terminal;
pub mod theme;

pub use terminal::TerminalSelector;
pub use theme::Theme;
