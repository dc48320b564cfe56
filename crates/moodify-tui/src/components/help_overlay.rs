//! HelpOverlay component: centered popup listing the key bindings.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_MUTED, C_PANEL_BORDER, C_PRIMARY, C_SECONDARY},
};

const C_POPUP_BG: Color = Color::Rgb(18, 18, 26);

/// (section, [(keys, meaning)])
const BINDINGS: &[(&str, &[(&str, &str)])] = &[
    (
        "moods",
        &[
            ("↑ / ↓  or  j / k", "move selection"),
            ("enter", "open mood"),
            ("a", "add a mood"),
            ("e / E", "rename / edit description"),
            ("d", "delete mood (asks first)"),
            ("r", "open a random mood"),
            ("/", "filter moods"),
        ],
    ),
    (
        "songs",
        &[
            ("/  or  i", "type a query (empty = popular)"),
            ("enter (typing)", "search now"),
            ("enter  or  +", "add result to favorites"),
            ("d  or  -", "remove favorite"),
            ("X", "clear favorites (asks first)"),
            ("y", "copy preview url / song"),
            ("esc", "back to moods"),
        ],
    ),
    (
        "ui",
        &[
            ("tab / shift-tab", "focus next / previous pane"),
            ("1 / 2", "focus pane"),
            ("K", "toggle keys bar"),
            ("?", "toggle this help overlay"),
            ("q / Ctrl+C", "quit"),
        ],
    ),
];

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    fn lines() -> Vec<Line<'static>> {
        let key_style = Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD);
        let section_style = Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD);

        let mut lines = vec![
            Line::from(Span::styled(" keyboard shortcuts", key_style)),
            Line::default(),
        ];
        for (section, rows) in BINDINGS {
            lines.push(Line::from(Span::styled(format!(" {}", section), section_style)));
            lines.extend(rows.iter().map(|(keys, meaning)| {
                Line::from(vec![
                    Span::styled(format!(" {:<18}", keys), key_style),
                    Span::styled(*meaning, Style::default().fg(C_SECONDARY)),
                ])
            }));
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            " press ? or esc to close",
            Style::default().fg(C_MUTED),
        )));
        lines
    }
}

impl Component for HelpOverlay {
    fn id(&self) -> ComponentId {
        ComponentId::HelpOverlay
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.visible {
            return vec![];
        }
        match key.code {
            KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc => vec![Action::ToggleHelp],
            // Swallow everything else while open
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::ToggleHelp = action {
            self.toggle();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, _state: &AppState) {
        if !self.visible {
            return;
        }
        let lines = Self::lines();
        let popup = popup_area(area, 64, lines.len() as u16 + 2);

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(C_PANEL_BORDER))
                        .style(Style::default().bg(C_POPUP_BG)),
                )
                .wrap(Wrap { trim: false }),
            popup,
        );
    }
}

fn popup_area(area: Rect, percent_x: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    popup
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    #[test]
    fn test_closes_on_escape_and_swallows_other_keys() {
        let s = AppState::new(true);
        let mut help = HelpOverlay::new();
        help.on_action(&Action::ToggleHelp, &s);
        assert!(help.visible);

        let j = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        assert!(help.handle_key(j, &s).is_empty());
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(matches!(help.handle_key(esc, &s).as_slice(), [Action::ToggleHelp]));
    }
}
