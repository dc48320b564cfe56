//! FilterInput: one line of editable text on top of tui-input. Used for the
//! song query, the mood filter and the add/rename prompts.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{layout::Rect, style::Style, widgets::Paragraph, Frame};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{C_FILTER_BG, C_FILTER_FG, C_MUTED};

#[derive(Debug, PartialEq)]
pub enum FilterAction {
    Changed(String),
    Confirmed(String),
    Cancelled,
    None,
}

pub struct FilterInput {
    input: Input,
    editing: bool,
    prefix: &'static str,
    placeholder: &'static str,
}

impl FilterInput {
    pub fn new(placeholder: &'static str) -> Self {
        Self::with_prefix("/", placeholder)
    }

    pub fn with_prefix(prefix: &'static str, placeholder: &'static str) -> Self {
        Self {
            input: Input::default(),
            editing: false,
            prefix,
            placeholder,
        }
    }

    pub fn activate(&mut self) {
        self.editing = true;
    }

    pub fn deactivate(&mut self) {
        self.editing = false;
    }

    pub fn is_active(&self) -> bool {
        self.editing
    }

    pub fn clear(&mut self) {
        self.input.reset();
    }

    pub fn set_value(&mut self, value: &str) {
        self.input = Input::new(value.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.input.value().is_empty()
    }

    /// Esc first clears the text (`Changed("")`), then leaves editing
    /// (`Cancelled`). Enter leaves editing with the current value.
    pub fn handle_key(&mut self, key: KeyEvent) -> FilterAction {
        match key.code {
            KeyCode::Esc if !self.is_empty() => {
                self.clear();
                FilterAction::Changed(String::new())
            }
            KeyCode::Esc => {
                self.editing = false;
                FilterAction::Cancelled
            }
            KeyCode::Enter => {
                self.editing = false;
                FilterAction::Confirmed(self.input.value().to_string())
            }
            _ => match self.input.handle_event(&Event::Key(key)) {
                Some(change) if change.value => {
                    FilterAction::Changed(self.input.value().to_string())
                }
                _ => FilterAction::None,
            },
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let lead = self.prefix.chars().count() as u16 + 1;
        let scroll = self
            .input
            .visual_scroll(area.width.saturating_sub(lead + 2) as usize);
        let (body, fg) = match self.input.value() {
            "" => (self.placeholder.to_string(), C_MUTED),
            value => (value.chars().skip(scroll).collect(), C_FILTER_FG),
        };
        frame.render_widget(
            Paragraph::new(format!("{} {}", self.prefix, body))
                .style(Style::default().fg(fg).bg(C_FILTER_BG)),
            area,
        );

        if self.editing && area.width > 0 {
            let x = area.x + lead + self.input.visual_cursor().saturating_sub(scroll) as u16;
            frame.set_cursor_position((x.min(area.right() - 1), area.y));
        }
    }
}
