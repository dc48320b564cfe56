//! MoodList component: the mood-selection screen.

use std::time::Instant;

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use moodify_core::models::{Mood, MoodId, MoodPatch};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{mood_accent, C_ACCENT, C_FAVORITE, C_MUTED, C_PANEL_BORDER_FOCUSED, C_PRIMARY, C_SECONDARY, C_SELECTION_BG},
    widgets::{
        filter_input::{FilterAction, FilterInput},
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
        status_bar::InputMode,
        text::truncate_to_width,
    },
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum PromptKind {
    Add,
    Rename(MoodId),
    Describe(MoodId),
}

struct Prompt {
    kind: PromptKind,
    input: FilterInput,
}

pub struct MoodList {
    pub list: ScrollableList<Mood>,
    pub filter_input: FilterInput,
    filter: String,
    prompt: Option<Prompt>,
    confirm_delete: Option<MoodId>,
    list_state: ListState,
    last_click: Option<(usize, Instant)>,
}

impl MoodList {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
            filter_input: FilterInput::new("mood name or description…"),
            filter: String::new(),
            prompt: None,
            confirm_delete: None,
            list_state: ListState::default(),
            last_click: None,
        }
    }

    pub fn sync_moods(&mut self, state: &AppState) {
        let selected = self.selected_id();
        self.list.set_items(state.moods.clone());
        if !self.filter.is_empty() {
            let q = self.filter.clone();
            self.list.show_where(|m| mood_matches(m, &q));
        }
        if let Some(id) = selected {
            self.list.select_where(|m| m.id == id);
        }
    }

    fn set_filter(&mut self, q: &str) {
        self.filter = q.to_string();
        self.list.show_where(|m| mood_matches(m, q));
    }

    pub fn select_mood(&mut self, id: MoodId) {
        self.list.select_where(|m| m.id == id);
    }

    pub fn selected_id(&self) -> Option<MoodId> {
        self.list.selected_item().map(|m| m.id)
    }

    fn open_prompt(&mut self, kind: PromptKind, initial: &str) -> Vec<Action> {
        let label = match kind {
            PromptKind::Add => "new mood:",
            PromptKind::Rename(_) => "name:",
            PromptKind::Describe(_) => "description:",
        };
        let mut input = FilterInput::with_prefix(label, "");
        input.set_value(initial);
        input.activate();
        self.prompt = Some(Prompt { kind, input });
        vec![Action::OpenInput(InputMode::Edit)]
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Vec<Action> {
        let Some(prompt) = self.prompt.as_mut() else {
            return vec![];
        };
        match prompt.input.handle_key(key) {
            FilterAction::Confirmed(text) => {
                let kind = prompt.kind;
                self.prompt = None;
                let action = match kind {
                    PromptKind::Add => Action::AddMood(text),
                    PromptKind::Rename(id) => Action::UpdateMood(
                        id,
                        MoodPatch {
                            name: Some(text),
                            ..Default::default()
                        },
                    ),
                    PromptKind::Describe(id) => Action::UpdateMood(
                        id,
                        MoodPatch {
                            description: Some(text),
                            ..Default::default()
                        },
                    ),
                };
                vec![Action::CloseInput, action]
            }
            FilterAction::Cancelled => {
                self.prompt = None;
                vec![Action::CloseInput]
            }
            FilterAction::Changed(_) | FilterAction::None => vec![],
        }
    }

    fn render_item<'a>(&self, mood: &'a Mood, is_selected: bool, state: &AppState) -> ListItem<'a> {
        let accent = mood_accent(&mood.route_key());
        let name_style = if is_selected {
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_SECONDARY)
        };
        let count = state.favorite_counts.get(&mood.id).copied().unwrap_or(0);

        let mut spans = vec![
            Span::styled(if is_selected { " ▸ " } else { "   " }, Style::default().fg(accent)),
            Span::styled("● ", Style::default().fg(accent)),
        ];
        if let Some(emoji) = mood.emoji.as_deref() {
            spans.push(Span::raw(format!("{} ", emoji)));
        }
        spans.push(Span::styled(mood.name.as_str(), name_style));
        if count > 0 {
            spans.push(Span::styled(format!("  ♥ {}", count), Style::default().fg(C_FAVORITE)));
        }
        if !mood.description.is_empty() {
            spans.push(Span::styled("  ", Style::default()));
            spans.push(Span::styled(
                truncate_to_width(&mood.description, 60),
                Style::default().fg(C_MUTED),
            ));
        }

        let bg = if is_selected {
            Style::default().bg(C_SELECTION_BG)
        } else {
            Style::default()
        };
        ListItem::new(Line::from(spans)).style(bg)
    }
}

fn mood_matches(mood: &Mood, q: &str) -> bool {
    let text = format!("{} {}", mood.name, mood.description).to_lowercase();
    q.to_lowercase()
        .split_whitespace()
        .all(|term| text.contains(term))
}

impl Component for MoodList {
    fn id(&self) -> ComponentId {
        ComponentId::MoodList
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        if self.prompt.is_some() {
            return self.handle_prompt_key(key);
        }

        if let Some(id) = self.confirm_delete.take() {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('d') => vec![Action::DeleteMood(id)],
                _ => vec![],
            };
        }

        if self.filter_input.is_active() {
            match key.code {
                KeyCode::Up => {
                    self.list.select_up(1);
                    return vec![];
                }
                KeyCode::Down => {
                    self.list.select_down(1);
                    return vec![];
                }
                _ => {}
            }
            return match self.filter_input.handle_key(key) {
                FilterAction::Changed(q) => {
                    self.set_filter(&q);
                    vec![]
                }
                FilterAction::Confirmed(_) => vec![Action::CloseInput],
                FilterAction::Cancelled => {
                    self.set_filter("");
                    vec![Action::CloseInput]
                }
                FilterAction::None => vec![],
            };
        }

        let step = if key.modifiers.contains(KeyModifiers::SHIFT) { 5 } else { 1 };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(step),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(step),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),

            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
                if let Some(id) = self.selected_id() {
                    return vec![Action::OpenMood(id)];
                }
            }
            KeyCode::Char('a') => return self.open_prompt(PromptKind::Add, ""),
            KeyCode::Char('e') => {
                if let Some(m) = self.list.selected_item() {
                    let (id, name) = (m.id, m.name.clone());
                    return self.open_prompt(PromptKind::Rename(id), &name);
                }
            }
            KeyCode::Char('E') => {
                if let Some(m) = self.list.selected_item() {
                    let (id, desc) = (m.id, m.description.clone());
                    return self.open_prompt(PromptKind::Describe(id), &desc);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.confirm_delete = Some(id);
                }
            }
            KeyCode::Char('r') => {
                if !state.moods.is_empty() {
                    return vec![Action::RandomMood];
                }
            }
            KeyCode::Char('/') => {
                self.filter_input.activate();
                return vec![Action::OpenInput(InputMode::Search)];
            }
            KeyCode::Esc if !self.filter.is_empty() => {
                self.set_filter("");
                self.filter_input.clear();
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        let rel_row = event.row.saturating_sub(area.y + 1) as usize;
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                let is_double = self
                    .last_click
                    .map(|(row, t)| row == rel_row && t.elapsed().as_millis() < 400)
                    .unwrap_or(false);
                if self.list.handle_click(rel_row) && is_double {
                    self.last_click = None;
                    if let Some(id) = self.selected_id() {
                        return vec![Action::OpenMood(id)];
                    }
                } else {
                    self.last_click = Some((rel_row, Instant::now()));
                }
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::OpenMood(id) => self.select_mood(*id),
            Action::CloseInput => {
                self.prompt = None;
                self.filter_input.deactivate();
            }
            _ => {}
        }
        vec![]
    }

    fn collapse_summary(&self, _state: &AppState) -> Option<String> {
        self.list.selected_item().map(|m| m.name.clone())
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let count = format!("{}", state.moods.len());
        let block = pane_chrome(
            "moods",
            Some('1'),
            focused,
            C_PANEL_BORDER_FOCUSED,
            Some(Badge {
                text: &count,
                color: C_SECONDARY,
            }),
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }

        let footer_h = u16::from(
            self.prompt.is_some() || self.confirm_delete.is_some() || self.filter_input.is_active(),
        );
        let list_area = Rect {
            height: inner.height - footer_h,
            ..inner
        };
        let footer_area = Rect {
            y: inner.y + inner.height.saturating_sub(1),
            height: 1,
            ..inner
        };

        if state.moods.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  no moods yet, press a to add one",
                    Style::default().fg(C_MUTED),
                )),
                list_area,
            );
        } else if self.list.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  no moods match filter",
                    Style::default().fg(C_MUTED),
                )),
                list_area,
            );
        } else {
            let height = list_area.height as usize;
            self.list.ensure_visible(height);
            let sel_in_view = self.list.selected_in_view(height);
            let items: Vec<ListItem> = self
                .list
                .window(height)
                .enumerate()
                .map(|(row, mood)| self.render_item(mood, row == sel_in_view, state))
                .collect();
            self.list_state.select(Some(sel_in_view));
            frame.render_stateful_widget(List::new(items), list_area, &mut self.list_state);
        }

        if let Some(prompt) = &self.prompt {
            prompt.input.draw(frame, footer_area);
        } else if let Some(id) = self.confirm_delete {
            let name = state
                .moods
                .iter()
                .find(|m| m.id == id)
                .map(|m| m.name.as_str())
                .unwrap_or("?");
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" delete {:?} and its favorites? y/n", name),
                    Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
                )),
                footer_area,
            );
        } else if self.filter_input.is_active() {
            self.filter_input.draw(frame, footer_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodify_core::models::default_moods;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn state() -> AppState {
        let mut s = AppState::new(true);
        s.moods = default_moods();
        s
    }

    fn type_text(list: &mut MoodList, text: &str, s: &AppState) {
        for c in text.chars() {
            assert!(list.handle_key(key(c), s).is_empty());
        }
    }

    #[test]
    fn test_enter_opens_selected_mood() {
        let s = state();
        let mut list = MoodList::new();
        list.sync_moods(&s);
        list.handle_key(key('j'), &s);
        let actions = list.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &s);
        assert!(matches!(actions.as_slice(), [Action::OpenMood(MoodId(2))]));
    }

    #[test]
    fn test_add_prompt_emits_add_mood() {
        let s = state();
        let mut list = MoodList::new();
        list.sync_moods(&s);
        assert!(matches!(
            list.handle_key(key('a'), &s).as_slice(),
            [Action::OpenInput(InputMode::Edit)]
        ));
        type_text(&mut list, "Focus", &s);
        let actions = list.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &s);
        match actions.as_slice() {
            [Action::CloseInput, Action::AddMood(name)] => assert_eq!(name, "Focus"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rename_prefills_current_name() {
        let s = state();
        let mut list = MoodList::new();
        list.sync_moods(&s);
        list.handle_key(key('e'), &s);
        type_text(&mut list, "!", &s);
        let actions = list.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &s);
        match actions.as_slice() {
            [Action::CloseInput, Action::UpdateMood(MoodId(1), patch)] => {
                assert_eq!(patch.name.as_deref(), Some("Mutlu!"));
                assert!(patch.description.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let s = state();
        let mut list = MoodList::new();
        list.sync_moods(&s);
        assert!(list.handle_key(key('d'), &s).is_empty());
        assert!(list.handle_key(key('n'), &s).is_empty());
        assert!(list.handle_key(key('d'), &s).is_empty());
        assert!(matches!(
            list.handle_key(key('y'), &s).as_slice(),
            [Action::DeleteMood(MoodId(1))]
        ));
    }

    #[test]
    fn test_filter_narrows_list() {
        let s = state();
        let mut list = MoodList::new();
        list.sync_moods(&s);
        list.handle_key(key('/'), &s);
        type_text(&mut list, "sak", &s);
        assert_eq!(list.list.len(), 1);
        assert_eq!(list.selected_id(), Some(MoodId(3)));
    }
}
