//! Search prompt
//!
//! Text input with live results underneath. Up/Down move focus between the
//! input and the results, mirroring how the list wraps back to the input.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::list::{ListView, PAGE_SIZE};
use super::theme::Theme;
use crate::models::Item;

/// Which half of the prompt receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    None,
    /// The query text changed to this
    TextChanged(String),
    Select(usize),
    Dismiss,
}

/// Query text with a cursor counted in characters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Input {
    pub text: String,
    pub cursor: usize,
}

impl Input {
    fn byte_index(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index();
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor; false if nothing changed
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index();
        self.text.remove(at);
        true
    }

    /// Delete character at cursor; false if nothing changed
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let at = self.byte_index();
        self.text.remove(at);
        true
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Text split around the cursor
    pub fn split(&self) -> (&str, &str) {
        self.text.split_at(self.byte_index())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchView {
    pub input: Input,
    pub results: ListView,
    pub focus: Focus,
    /// Text changed and no results for it have arrived yet
    pub pending: bool,
}

impl SearchView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show results for the current text
    pub fn set_results(&mut self, items: Vec<Item>) {
        self.results.set_items(items);
        self.pending = false;
        if self.results.is_empty() {
            self.focus = Focus::Input;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> SearchAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => return SearchAction::Dismiss,
            KeyCode::Esc => return SearchAction::Dismiss,
            KeyCode::Enter => {
                return match self.results.selected() {
                    Some(index) => SearchAction::Select(index),
                    None => SearchAction::None,
                }
            }
            _ => {}
        }

        match self.focus {
            Focus::Input => self.handle_input_key(key, ctrl),
            Focus::List => self.handle_list_key(key, ctrl),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent, ctrl: bool) -> SearchAction {
        let changed = match key.code {
            KeyCode::Char(c) if !ctrl => {
                self.input.insert(c);
                true
            }
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => {
                self.input.left();
                false
            }
            KeyCode::Right => {
                self.input.right();
                false
            }
            KeyCode::Home => {
                self.input.home();
                false
            }
            KeyCode::End => {
                self.input.end();
                false
            }
            KeyCode::Down if !self.results.is_empty() => {
                self.focus = Focus::List;
                self.results.state.first();
                false
            }
            KeyCode::Up if !self.results.is_empty() => {
                self.focus = Focus::List;
                self.results.state.last();
                false
            }
            _ => false,
        };

        if changed {
            self.pending = true;
            SearchAction::TextChanged(self.input.text.clone())
        } else {
            SearchAction::None
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent, ctrl: bool) -> SearchAction {
        let state = &mut self.results.state;
        match key.code {
            KeyCode::Up if state.is_first() => self.focus = Focus::Input,
            KeyCode::Down if state.is_last() => self.focus = Focus::Input,
            KeyCode::Up => state.up(),
            KeyCode::Down => state.down(),
            KeyCode::PageUp => state.page_up(PAGE_SIZE),
            KeyCode::PageDown => state.page_down(PAGE_SIZE),
            KeyCode::Home => state.first(),
            KeyCode::End => state.last(),
            // Typing while on the list goes back to the query
            KeyCode::Char(_) | KeyCode::Backspace if !ctrl => {
                self.focus = Focus::Input;
                return self.handle_input_key(key, ctrl);
            }
            _ => {}
        }
        SearchAction::None
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Input
                Constraint::Min(1),    // Results
                Constraint::Length(1), // Help
            ])
            .split(area);

        let input_focused = self.focus == Focus::Input;
        let (before, after) = self.input.split();
        let text = if input_focused {
            format!("⌕ {}│{}", before, after)
        } else {
            format!("⌕ {}", self.input.text)
        };
        let input = Paragraph::new(text)
            .style(Theme::text())
            .block(Theme::panel(" SEARCH ".to_string(), input_focused));
        frame.render_widget(input, chunks[0]);

        let title = if self.pending {
            " RESULTS ⟳ ".to_string()
        } else {
            format!(" RESULTS ({}) ", self.results.items().len())
        };
        let block = Theme::panel(title, !input_focused);
        let inner = block.inner(chunks[1]);
        frame.render_widget(block, chunks[1]);

        let empty = if self.input.text.is_empty() {
            "Type to search..."
        } else if self.pending {
            "Searching..."
        } else {
            "No results"
        };
        self.results.render(frame, inner, !input_focused, empty);

        frame.render_widget(help_line(), chunks[2]);
    }
}

fn help_line() -> Paragraph<'static> {
    Paragraph::new(Line::from(vec![
        Span::styled(" ↑↓ ", Theme::keybind()),
        Span::styled("focus results  ", Theme::dimmed()),
        Span::styled("↵ ", Theme::keybind()),
        Span::styled("select  ", Theme::dimmed()),
        Span::styled("esc ", Theme::keybind()),
        Span::styled("back", Theme::dimmed()),
    ]))
}
