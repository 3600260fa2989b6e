//! List prompt
//!
//! Scrollable list of spec items with keyboard navigation.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use super::theme::Theme;
use crate::models::Item;

/// Rows moved by PgUp/PgDn
pub const PAGE_SIZE: usize = 10;

/// Selection and scroll position within a list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Scroll offset for viewport
    pub offset: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            len,
        }
    }

    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
    }

    pub fn page_down(&mut self, page_size: usize) {
        if self.len > 0 {
            self.selected = (self.selected + page_size).min(self.len - 1);
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        self.selected = self.len.saturating_sub(1);
    }

    pub fn is_first(&self) -> bool {
        self.selected == 0
    }

    pub fn is_last(&self) -> bool {
        self.selected + 1 >= self.len
    }

    /// Update offset to keep selected item visible
    pub fn scroll_into_view(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + visible_height {
            self.offset = self.selected - visible_height + 1;
        }
    }

    /// Update length (e.g., when new results come in)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
            self.offset = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
        self.offset = self.offset.min(self.selected);
    }
}

/// What a key press asks the prompt to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    None,
    Select(usize),
    Dismiss,
}

/// Items plus their selection state
#[derive(Debug, Clone, Default)]
pub struct ListView {
    items: Vec<Item>,
    pub state: ListState,
}

impl ListView {
    pub fn new(items: Vec<Item>) -> Self {
        let state = ListState::new(items.len());
        Self { items, state }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.state.selected)
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.items.get(self.state.selected)
    }

    /// Replace the items, keeping the selection in range
    pub fn set_items(&mut self, items: Vec<Item>) {
        self.state.set_len(items.len());
        self.items = items;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ListAction {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                ListAction::Dismiss
            }
            KeyCode::Esc | KeyCode::Char('q') => ListAction::Dismiss,
            KeyCode::Enter => match self.selected() {
                Some(index) => ListAction::Select(index),
                None => ListAction::None,
            },
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.up();
                ListAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.down();
                ListAction::None
            }
            KeyCode::PageUp => {
                self.state.page_up(PAGE_SIZE);
                ListAction::None
            }
            KeyCode::PageDown => {
                self.state.page_down(PAGE_SIZE);
                ListAction::None
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.state.first();
                ListAction::None
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.state.last();
                ListAction::None
            }
            _ => ListAction::None,
        }
    }

    /// Render rows into `area` (no border)
    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool, empty_text: &str) {
        if self.items.is_empty() {
            let empty = Paragraph::new(empty_text.to_string()).style(Theme::dimmed());
            frame.render_widget(empty, area);
            return;
        }

        let height = area.height as usize;
        self.state.scroll_into_view(height);

        let rows: Vec<ListItem> = self
            .items
            .iter()
            .enumerate()
            .skip(self.state.offset)
            .take(height)
            .map(|(i, item)| {
                let is_selected = focused && i == self.state.selected;
                let marker = if i == self.state.selected { "▸ " } else { "  " };

                let mut spans = vec![
                    Span::styled(marker, Theme::title()),
                    Span::styled(
                        item.title.as_str(),
                        if is_selected {
                            Theme::selected()
                        } else {
                            Theme::text()
                        },
                    ),
                ];
                if let Some(sub) = item.subtitle.as_deref().filter(|s| !s.is_empty()) {
                    spans.push(Span::raw("  "));
                    spans.push(Span::styled(sub, Theme::subtitle()));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        frame.render_widget(List::new(rows).style(Theme::text()), area);
    }
}
