//! Header: 2-row top bar.
//!
//! Row 1: app name, current screen title, storage badge.
//! Row 2: the open mood's description, or a hint on the selection screen.
//!
//! Not focusable.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::View,
    app_state::AppState,
    theme::{mood_accent, C_ACCENT, C_BADGE_PENDING, C_MUTED, C_PRIMARY, C_SECONDARY},
};

pub struct Header;

impl Header {
    pub fn new() -> Self {
        Self
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let mut row1 = vec![Span::styled(
            " moodify ",
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        )];
        let row2 = match (state.view, state.current_mood()) {
            (View::MoodDetail(_), Some(mood)) => {
                let accent = mood_accent(&mood.route_key());
                row1.push(Span::styled("● ", Style::default().fg(accent)));
                row1.push(Span::styled(
                    format!("{} Hislerin!", mood.name),
                    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
                ));
                Line::from(Span::styled(
                    format!("  {}", mood.description),
                    Style::default().fg(C_SECONDARY),
                ))
            }
            _ => {
                row1.push(Span::styled(
                    "Bugün nasıl hissediyorsun?",
                    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
                ));
                Line::from(Span::styled(
                    format!("  {} moods", state.moods.len()),
                    Style::default().fg(C_MUTED),
                ))
            }
        };
        if state.ephemeral {
            row1.push(Span::styled(
                "  [ephemeral]",
                Style::default().fg(C_BADGE_PENDING),
            ));
        }

        let lines = if area.height >= 2 {
            vec![Line::from(row1), row2]
        } else {
            vec![Line::from(row1)]
        };
        frame.render_widget(Paragraph::new(lines), area);
    }
}
