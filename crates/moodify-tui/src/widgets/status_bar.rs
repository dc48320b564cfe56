//! Status bar: bottom line with input mode and keybindings.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::View;
use crate::theme::{C_MODE_EDIT, C_MODE_NORMAL, C_MODE_SEARCH, C_MUTED, C_SECONDARY};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    /// Typing into the song query box or a list filter.
    Search,
    /// Typing into a mood name/description prompt.
    Edit,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Search => "SEARCH",
            Self::Edit => "EDIT",
        }
    }

    pub fn color(self) -> ratatui::style::Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Search => C_MODE_SEARCH,
            Self::Edit => C_MODE_EDIT,
        }
    }
}

fn keys_for(mode: InputMode, view: View) -> &'static str {
    match mode {
        InputMode::Normal => match view {
            View::MoodSelect => {
                " ↑↓/jk select  Enter open  a add  e/E edit name/desc  d delete  r random  / filter  ? help  q quit"
            }
            View::MoodDetail(_) => {
                " / search  Enter/+ add  d remove  X clear  y copy preview  Tab pane  Esc back  ? help  q quit"
            }
        },
        InputMode::Search => " type to search  ↑↓ move  Enter search now  Esc clear+close",
        InputMode::Edit => " type text  Enter save  Esc cancel",
    }
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, view: View, note: Option<&str>) {
    let label = match (mode, view) {
        (InputMode::Normal, View::MoodSelect) => "MOODS",
        (InputMode::Normal, View::MoodDetail(_)) => "SONGS",
        (m, _) => m.label(),
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", label),
            Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(keys_for(mode, view), Style::default().fg(C_MUTED)),
    ];
    if let Some(note) = note {
        spans.push(Span::styled(format!("  {}", note), Style::default().fg(C_SECONDARY)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
