//! Favorites component: the open mood's saved songs.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use moodify_core::models::Song;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        mood_accent, C_ACCENT, C_ARTIST, C_FAVORITE, C_MUTED, C_PANEL_BORDER_FOCUSED, C_PRIMARY,
        C_SECONDARY, C_SELECTION_BG,
    },
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
        text::truncate_to_width,
    },
};

pub struct Favorites {
    pub list: ScrollableList<Song>,
    confirm_clear: bool,
    list_state: ListState,
}

impl Favorites {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
            confirm_clear: false,
            list_state: ListState::default(),
        }
    }

    pub fn sync_favorites(&mut self, state: &AppState) {
        let selected = self.list.selected_item().map(|s| s.track_id);
        self.list.set_items(state.favorites.clone());
        if let Some(id) = selected {
            self.list.select_where(|s| s.track_id == id);
        }
    }
}

impl Component for Favorites {
    fn id(&self) -> ComponentId {
        ComponentId::Favorites
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        if self.confirm_clear {
            self.confirm_clear = false;
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('X') => vec![Action::ClearFavorites],
                _ => vec![],
            };
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),

            KeyCode::Char('d') | KeyCode::Delete | KeyCode::Char('-') => {
                if let Some(song) = self.list.selected_item() {
                    return vec![Action::RemoveFavorite(song.track_id)];
                }
            }
            KeyCode::Char('X') => {
                if !self.list.is_empty() {
                    self.confirm_clear = true;
                }
            }
            KeyCode::Char('y') => {
                if let Some(song) = self.list.selected_item() {
                    return vec![Action::CopyToClipboard(song.display())];
                }
            }
            KeyCode::Esc => return vec![Action::Back],
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
                self.list.handle_click(rel_row);
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::OpenMood(_) = action {
            self.list.select_first();
            self.confirm_clear = false;
        }
        vec![]
    }

    fn collapse_summary(&self, state: &AppState) -> Option<String> {
        Some(format!("♥ {}", state.favorites.len()))
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let mood = state.current_mood();
        let accent = mood
            .map(|m| mood_accent(&m.route_key()))
            .unwrap_or(C_PANEL_BORDER_FOCUSED);
        let title = match mood {
            Some(m) => format!("{} Hislerin!", m.name),
            None => "favorites".to_string(),
        };
        let count = format!("♥ {}", state.favorites.len());
        let block = pane_chrome(
            &title,
            Some('2'),
            focused,
            accent,
            Some(Badge {
                text: &count,
                color: C_FAVORITE,
            }),
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }

        let footer_h = u16::from(self.confirm_clear);
        let list_area = Rect {
            height: inner.height - footer_h,
            ..inner
        };

        if self.list.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  no favorites yet, add one from the results",
                    Style::default().fg(C_MUTED),
                )),
                list_area,
            );
        } else {
            let height = list_area.height as usize;
            let width = list_area.width as usize;
            self.list.ensure_visible(height);
            let sel_in_view = self.list.selected_in_view(height);
            let items: Vec<ListItem> = self
                .list
                .window(height)
                .enumerate()
                .map(|(row, song)| {
                    let is_selected = row == sel_in_view;
                    let title_style = if is_selected {
                        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(C_SECONDARY)
                    };
                    let line = Line::from(vec![
                        Span::styled(
                            if is_selected { " ▸ ♥ " } else { "   ♥ " },
                            Style::default().fg(C_FAVORITE),
                        ),
                        Span::styled(
                            truncate_to_width(&song.track_name, width.saturating_sub(6)),
                            title_style,
                        ),
                        Span::styled(format!("  {}", song.artist_name), Style::default().fg(C_ARTIST)),
                    ]);
                    let bg = if is_selected {
                        Style::default().bg(C_SELECTION_BG)
                    } else {
                        Style::default()
                    };
                    ListItem::new(line).style(bg)
                })
                .collect();
            self.list_state.select(Some(sel_in_view));
            frame.render_stateful_widget(List::new(items), list_area, &mut self.list_state);
        }

        if self.confirm_clear {
            let footer = Rect {
                y: inner.y + inner.height - 1,
                height: 1,
                ..inner
            };
            frame.render_widget(
                Paragraph::new(Span::styled(
                    " remove every favorite of this mood? y/n",
                    Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
                )),
                footer,
            );
        }
    }
}
