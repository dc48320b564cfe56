//! PaneChrome: the bordered frame every pane draws inside.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

use crate::theme::{style_unfocused_border, C_MUTED, C_NUMBER_HINT, C_PRIMARY};

/// Short status text in the top-right corner ("10", "ERR", "♥ 3").
pub struct Badge<'a> {
    pub text: &'a str,
    pub color: Color,
}

/// A focused pane takes `accent` for its border; the detail view passes the
/// open mood's accent.
pub fn pane_chrome<'a>(
    title: &'a str,
    number_key: Option<char>,
    focused: bool,
    accent: Color,
    badge: Option<Badge<'a>>,
) -> Block<'a> {
    let (border, title_style) = if focused {
        (
            Style::default().fg(accent),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        )
    } else {
        (style_unfocused_border(), Style::default().fg(C_MUTED))
    };

    let hint = number_key.map(|k| Span::styled(format!("[{}] ", k), Style::default().fg(C_NUMBER_HINT)));
    let heading: Line = hint
        .into_iter()
        .chain(std::iter::once(Span::styled(title, title_style)))
        .collect();

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(heading);
    if let Some(Badge { text, color }) = badge {
        let label = Span::styled(
            format!(" {} ", text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        );
        block = block.title_top(Line::from(label).right_aligned());
    }
    block
}
