//! Terminal-backed selector
//!
//! Each prompt takes over the terminal (raw mode, alternate screen) for its
//! own duration and hands it back before returning, so the player and the
//! log never fight the TUI.

use std::io::{stdout, Stdout};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame, Terminal,
};

use super::list::{ListAction, ListView};
use super::search::{SearchAction, SearchView};
use super::theme::Theme;
use crate::models::Item;
use crate::query::LiveQuery;
use crate::selector::{SelectionError, Selector};

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

/// How long to wait for a key before checking for search results
pub const TICK_RATE: Duration = Duration::from_millis(50);

/// Where key presses come from
pub trait KeySource {
    /// Wait up to `timeout` for a key press
    fn next_key(&mut self, timeout: Duration) -> std::io::Result<Option<KeyEvent>>;
}

/// Keys read from the real terminal
#[derive(Debug, Default)]
pub struct CrosstermKeys;

impl KeySource for CrosstermKeys {
    fn next_key(&mut self, timeout: Duration) -> std::io::Result<Option<KeyEvent>> {
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(key));
                }
            }
        }
        Ok(None)
    }
}

/// `Selector` that draws prompts with ratatui
#[derive(Debug)]
pub struct TerminalSelector {
    tick: Duration,
    keys: CrosstermKeys,
}

impl TerminalSelector {
    pub fn new() -> Self {
        Self {
            tick: TICK_RATE,
            keys: CrosstermKeys,
        }
    }
}

impl Default for TerminalSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl Selector for TerminalSelector {
    fn select(&mut self, items: &[Item]) -> Result<Option<usize>, SelectionError> {
        let tick = self.tick;
        let keys = &mut self.keys;
        with_terminal(|terminal| run_list(terminal, keys, tick, items))
    }

    fn search(&mut self, query: &mut dyn LiveQuery) -> Result<Option<Item>, SelectionError> {
        let tick = self.tick;
        let keys = &mut self.keys;
        with_terminal(|terminal| run_search(terminal, keys, tick, query))
    }
}

/// Setup terminal for TUI mode
fn init_terminal() -> std::io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> std::io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn with_terminal<T>(
    prompt: impl FnOnce(&mut Tui) -> Result<T, SelectionError>,
) -> Result<T, SelectionError> {
    let mut terminal = init_terminal()?;
    let result = prompt(&mut terminal);

    // Always restore terminal, even on error
    let restored = restore_terminal(&mut terminal);
    let value = result?;
    restored?;
    Ok(value)
}

/// Run a list prompt until an item is chosen or the prompt is dismissed
pub fn run_list<B: Backend, K: KeySource + ?Sized>(
    terminal: &mut Terminal<B>,
    keys: &mut K,
    tick: Duration,
    items: &[Item],
) -> Result<Option<usize>, SelectionError> {
    let mut view = ListView::new(items.to_vec());

    loop {
        terminal.draw(|frame| render_list_prompt(frame, &mut view))?;

        let Some(key) = keys.next_key(tick)? else {
            continue;
        };
        match view.handle_key(key) {
            ListAction::Select(index) => return Ok(Some(index)),
            ListAction::Dismiss => return Ok(None),
            ListAction::None => {}
        }
    }
}

/// Run a search prompt, feeding text to `query` and showing what it returns
pub fn run_search<B: Backend, K: KeySource + ?Sized>(
    terminal: &mut Terminal<B>,
    keys: &mut K,
    tick: Duration,
    query: &mut dyn LiveQuery,
) -> Result<Option<Item>, SelectionError> {
    let mut view = SearchView::new();

    loop {
        if let Some(items) = query.poll()? {
            view.set_results(items);
        }

        terminal.draw(|frame| {
            let area = frame.area();
            render_background(frame, area);
            view.render(frame, area);
        })?;

        let Some(key) = keys.next_key(tick)? else {
            continue;
        };
        match view.handle_key(key) {
            SearchAction::TextChanged(text) => query.on_text_changed(&text),
            SearchAction::Select(index) => {
                let items = view.results.items();
                return items
                    .get(index)
                    .cloned()
                    .map(Some)
                    .ok_or(SelectionError::OutOfRange {
                        index,
                        len: items.len(),
                    });
            }
            SearchAction::Dismiss => return Ok(None),
            SearchAction::None => {}
        }
    }
}

fn render_background(frame: &mut Frame, area: Rect) {
    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
        area,
    );
}

fn render_list_prompt(frame: &mut Frame, view: &mut ListView) {
    let area = frame.area();
    render_background(frame, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // List
            Constraint::Length(1), // Help
        ])
        .split(area);

    let block = Theme::panel(format!(" SELECT ({}) ", view.items().len()), true);
    let inner = block.inner(chunks[0]);
    frame.render_widget(block, chunks[0]);
    view.render(frame, inner, true, "Nothing to choose from");

    let help = Paragraph::new(Line::from(vec![
        Span::styled(" ↑↓ ", Theme::keybind()),
        Span::styled("navigate  ", Theme::dimmed()),
        Span::styled("↵ ", Theme::keybind()),
        Span::styled("select  ", Theme::dimmed()),
        Span::styled("q ", Theme::keybind()),
        Span::styled("back", Theme::dimmed()),
    ]));
    frame.render_widget(help, chunks[1]);
}
