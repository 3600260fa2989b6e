//! Colour palette and style helpers for the prompts

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #101418
    pub const BACKGROUND: Color = Color::Rgb(0x10, 0x14, 0x18);

    /// Primary: #ffb000 (amber)
    pub const PRIMARY: Color = Color::Rgb(0xff, 0xb0, 0x00);

    /// Secondary: #5fd7ff (sky)
    pub const SECONDARY: Color = Color::Rgb(0x5f, 0xd7, 0xff);

    /// Text: #dcdcdc
    pub const TEXT: Color = Color::Rgb(0xdc, 0xdc, 0xdc);

    /// Dim: #6c7680
    pub const DIM: Color = Color::Rgb(0x6c, 0x76, 0x80);

    /// Error: #ff5f5f
    pub const ERROR: Color = Color::Rgb(0xff, 0x5f, 0x5f);

    /// Border when the panel does not have focus
    pub const BORDER: Color = Color::Rgb(0x3a, 0x44, 0x4e);

    // ═══════════════════════════════════════════════════════════════════════
    // STYLES
    // ═══════════════════════════════════════════════════════════════════════

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn subtitle() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    /// Highlighted list row
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn keybind() -> Style {
        Style::default()
            .fg(Self::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(Self::PRIMARY)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Self::BORDER)
        }
    }

    /// Rounded panel with a title
    pub fn panel(title: String, focused: bool) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Self::border(focused))
            .title(ratatui::text::Span::styled(title, Self::title()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(color: Color) -> (u8, u8, u8) {
        match color {
            Color::Rgb(r, g, b) => (r, g, b),
            other => panic!("{other:?} is not RGB"),
        }
    }

    // https://www.w3.org/TR/WCAG20/#relativeluminancedef
    fn luminance(color: Color) -> f64 {
        let channel = |c: u8| {
            let c = c as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        let (r, g, b) = rgb(color);
        0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
    }

    fn contrast(a: Color, b: Color) -> f64 {
        let (l1, l2) = (luminance(a), luminance(b));
        (l1.max(l2) + 0.05) / (l1.min(l2) + 0.05)
    }

    #[test]
    fn test_text_colors_meet_wcag_aa() {
        for color in [Theme::TEXT, Theme::PRIMARY, Theme::SECONDARY, Theme::ERROR] {
            assert!(contrast(color, Theme::BACKGROUND) >= 4.5, "{color:?}");
        }
    }

    #[test]
    fn test_selected_row_is_readable() {
        assert!(contrast(Theme::BACKGROUND, Theme::PRIMARY) >= 4.5);
    }

    #[test]
    fn test_dim_is_large_text_readable() {
        assert!(contrast(Theme::DIM, Theme::BACKGROUND) >= 3.0);
    }

    #[test]
    fn test_border_focus() {
        assert_eq!(Theme::border(true).fg, Some(Theme::PRIMARY));
        assert_eq!(Theme::border(false).fg, Some(Theme::BORDER));
    }
}
