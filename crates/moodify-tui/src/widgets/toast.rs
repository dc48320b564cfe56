//! Toast notifications: transient status messages plus one persistent
//! spinner for in-flight searches.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::theme::{C_TOAST_ERROR, C_TOAST_INFO, C_TOAST_SUCCESS, C_TOAST_WARNING};
use crate::widgets::text::{display_width, truncate_to_width};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    fn icon(self) -> &'static str {
        match self {
            Severity::Info => "·",
            Severity::Success => "✓",
            Severity::Warning => "!",
            Severity::Error => "✗",
        }
    }

    fn color(self) -> Color {
        match self {
            Severity::Info => C_TOAST_INFO,
            Severity::Success => C_TOAST_SUCCESS,
            Severity::Warning => C_TOAST_WARNING,
            Severity::Error => C_TOAST_ERROR,
        }
    }

    fn ttl(self) -> Duration {
        match self {
            Severity::Info | Severity::Success => Duration::from_secs(3),
            Severity::Warning => Duration::from_secs(4),
            Severity::Error => Duration::from_secs(5),
        }
    }
}

struct Toast {
    message: String,
    severity: Severity,
    expires: Instant,
}

const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];
const MAX_VISIBLE: usize = 4;

#[derive(Default)]
pub struct ToastManager {
    toasts: VecDeque<Toast>,
    /// Label and animation frame of the running spinner.
    spinner: Option<(String, usize)>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `message`. An identical message already on screen is replaced.
    pub fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        self.toasts.retain(|t| t.message != message);
        self.toasts.push_back(Toast {
            message,
            severity,
            expires: Instant::now() + severity.ttl(),
        });
        if self.toasts.len() > MAX_VISIBLE {
            self.toasts.pop_front();
        }
    }

    /// Start the spinner, or relabel it when already running.
    pub fn spinner(&mut self, message: impl Into<String>) {
        let message = message.into();
        match self.spinner.as_mut() {
            Some((label, _)) => *label = message,
            None => self.spinner = Some((message, 0)),
        }
    }

    pub fn dismiss_spinner(&mut self) {
        self.spinner = None;
    }

    pub fn has_spinner(&self) -> bool {
        self.spinner.is_some()
    }

    /// Drop expired toasts and advance the spinner. Call each tick.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.toasts.retain(|t| t.expires > now);
        if let Some((_, frame)) = self.spinner.as_mut() {
            *frame = (*frame + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty() && self.spinner.is_none()
    }

    /// Render in the top-right corner of `area`, spinner first, newest
    /// toast next.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let max_width = (area.width / 2).clamp(30, 60).min(area.width);
        let spinner = self
            .spinner
            .iter()
            .map(|(label, f)| (SPINNER_FRAMES[*f], label.as_str(), C_TOAST_INFO));
        let toasts = self
            .toasts
            .iter()
            .rev()
            .map(|t| (t.severity.icon(), t.message.as_str(), t.severity.color()));

        for (row, (icon, message, color)) in spinner.chain(toasts).enumerate() {
            let y = area.y + 1 + row as u16;
            if y >= area.bottom() {
                break;
            }
            let text = truncate_to_width(message, max_width.saturating_sub(4) as usize);
            let width = (display_width(&text) as u16 + 4).min(max_width);
            let slot = Rect::new(area.right().saturating_sub(width + 1), y, width, 1);
            frame.render_widget(Clear, slot);
            frame.render_widget(
                Paragraph::new(format!(" {} {} ", icon, text))
                    .style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
                slot,
            );
        }
    }
}
