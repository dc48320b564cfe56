//! SongSearch component: query box plus the current result set.
//!
//! Typing emits `QueryChanged` for every edit; the coordinator owns the
//! debounce. Results are re-read from `AppState::search` only when the
//! published song list actually changes, so the selection survives loading
//! and error updates.

use std::sync::Arc;

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

use moodify_core::coordinator::SearchPhase;
use moodify_core::models::Song;
use moodify_core::search::EffectiveQuery;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        mood_accent, C_ALBUM, C_ARTIST, C_BADGE_ERR, C_BADGE_LIVE, C_BADGE_PENDING, C_FAVORITE,
        C_MUTED, C_PANEL_BORDER_FOCUSED, C_PRIMARY, C_SECONDARY, C_SELECTION_BG,
    },
    widgets::{
        filter_input::{FilterAction, FilterInput},
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
        status_bar::InputMode,
        text::truncate_to_width,
    },
};

pub struct SongSearch {
    pub list: ScrollableList<Song>,
    pub query_input: FilterInput,
    shown: Arc<Vec<Song>>,
    list_state: ListState,
}

impl SongSearch {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
            query_input: FilterInput::with_prefix("search:", "artist, song… (empty = popular)"),
            shown: Arc::new(Vec::new()),
            list_state: ListState::default(),
        }
    }

    /// Pick up a newly published result set. Returns whether anything
    /// changed.
    pub fn sync_results(&mut self, state: &AppState) -> bool {
        if Arc::ptr_eq(&self.shown, &state.search.songs) {
            return false;
        }
        self.shown = Arc::clone(&state.search.songs);
        self.list.set_items(self.shown.as_ref().clone());
        self.list.select_first();
        true
    }

    fn selected_song(&self) -> Option<&Song> {
        self.list.selected_item()
    }

    fn add_selected(&self, state: &AppState) -> Vec<Action> {
        match self.selected_song() {
            Some(song) if state.is_favorite(song.track_id) => {
                vec![Action::Notify(format!("already a favorite: {}", song.track_name))]
            }
            Some(song) => vec![Action::AddFavorite(song.clone())],
            None => vec![],
        }
    }

    fn title(state: &AppState) -> String {
        match &state.search.results_for {
            Some(EffectiveQuery::Text(t)) => format!("results · {}", t),
            Some(EffectiveQuery::Popular) => "popular".to_string(),
            None => "search".to_string(),
        }
    }

    fn badge(state: &AppState) -> (String, ratatui::style::Color) {
        let search = &state.search;
        if search.is_loading() {
            ("…".to_string(), C_BADGE_PENDING)
        } else if search.phase == SearchPhase::Debouncing {
            ("·".to_string(), C_BADGE_PENDING)
        } else if search.last_error.is_some() {
            ("ERR".to_string(), C_BADGE_ERR)
        } else {
            (search.songs.len().to_string(), C_BADGE_LIVE)
        }
    }

    fn render_item<'a>(song: &'a Song, is_selected: bool, state: &AppState) -> ListItem<'a> {
        let favorite = state.is_favorite(song.track_id);
        let title_style = if is_selected {
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_SECONDARY)
        };

        let mut spans = vec![
            Span::styled(if is_selected { " ▸ " } else { "   " }, Style::default().fg(C_PRIMARY)),
            Span::styled(if favorite { "♥ " } else { "  " }, Style::default().fg(C_FAVORITE)),
            Span::styled(truncate_to_width(&song.track_name, 48), title_style),
        ];
        if !song.artist_name.is_empty() {
            spans.push(Span::styled(
                format!("  {}", song.artist_name),
                Style::default().fg(C_ARTIST),
            ));
        }
        if let Some(album) = song.collection_name.as_deref() {
            spans.push(Span::styled(
                format!("  {}", truncate_to_width(album, 32)),
                Style::default().fg(C_ALBUM),
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

impl Component for SongSearch {
    fn id(&self) -> ComponentId {
        ComponentId::SongSearch
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        if self.query_input.is_active() {
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
            return match self.query_input.handle_key(key) {
                FilterAction::Changed(text) => vec![Action::QueryChanged(text)],
                FilterAction::Confirmed(text) => vec![Action::CloseInput, Action::SearchNow(text)],
                FilterAction::Cancelled => vec![Action::CloseInput],
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

            KeyCode::Char('/') | KeyCode::Char('i') => {
                self.query_input.activate();
                return vec![Action::OpenInput(InputMode::Search)];
            }
            KeyCode::Enter | KeyCode::Char('+') => return self.add_selected(state),
            KeyCode::Char('y') => {
                if let Some(song) = self.selected_song() {
                    return match song.preview_url.as_deref() {
                        Some(url) => vec![Action::CopyToClipboard(url.to_string())],
                        None => vec![Action::Notify(format!("no preview for {}", song.track_name))],
                    };
                }
            }
            KeyCode::Esc => return vec![Action::Back],
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, state: &AppState) -> Vec<Action> {
        // Row 0 inside the border is the query box.
        let rel_row = event.row.saturating_sub(area.y + 2) as usize;
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                if event.row == area.y + 1 {
                    self.query_input.activate();
                    return vec![Action::OpenInput(InputMode::Search)];
                }
                if self.list.handle_click(rel_row) && event.modifiers.contains(KeyModifiers::CONTROL) {
                    return self.add_selected(state);
                }
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::OpenMood(_) => {
                self.query_input.clear();
                self.query_input.deactivate();
            }
            Action::CloseInput => self.query_input.deactivate(),
            _ => {}
        }
        vec![]
    }

    fn collapse_summary(&self, state: &AppState) -> Option<String> {
        Some(format!("{} ({})", Self::title(state), state.search.songs.len()))
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let accent = state
            .current_mood()
            .map(|m| mood_accent(&m.route_key()))
            .unwrap_or(C_PANEL_BORDER_FOCUSED);
        let title = Self::title(state);
        let (badge_text, badge_color) = Self::badge(state);
        let block = pane_chrome(
            &title,
            Some('1'),
            focused,
            accent,
            Some(Badge {
                text: &badge_text,
                color: badge_color,
            }),
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height < 2 {
            return;
        }

        let input_area = Rect { height: 1, ..inner };
        self.query_input.draw(frame, input_area);

        let list_area = Rect {
            y: inner.y + 1,
            height: inner.height - 1,
            ..inner
        };
        let error_h = u16::from(state.search.last_error.is_some() && list_area.height > 1);
        let rows_area = Rect {
            height: list_area.height - error_h,
            ..list_area
        };

        if self.list.is_empty() {
            let msg = if state.search.is_loading() {
                "  searching…"
            } else if state.search.results_for.is_some() {
                "  no songs found"
            } else {
                "  press / to search"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(msg, Style::default().fg(C_MUTED))),
                rows_area,
            );
        } else {
            let height = rows_area.height as usize;
            self.list.ensure_visible(height);
            let sel_in_view = self.list.selected_in_view(height);
            let items: Vec<ListItem> = self
                .list
                .window(height)
                .enumerate()
                .map(|(row, song)| Self::render_item(song, row == sel_in_view, state))
                .collect();
            self.list_state.select(Some(sel_in_view));
            frame.render_stateful_widget(List::new(items), rows_area, &mut self.list_state);
        }

        if error_h == 1 {
            if let Some(err) = state.search.last_error.as_deref() {
                let err_area = Rect {
                    y: list_area.y + list_area.height - 1,
                    height: 1,
                    ..list_area
                };
                let width = err_area.width.saturating_sub(2) as usize;
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        truncate_to_width(&format!(" search failed: {}", err), width),
                        Style::default().fg(C_BADGE_ERR),
                    )),
                    err_area,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodify_core::models::MoodId;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn song(id: u64, preview: Option<&str>) -> Song {
        Song {
            track_id: id,
            track_name: format!("track {}", id),
            artist_name: "artist".into(),
            artwork_url: String::new(),
            preview_url: preview.map(str::to_string),
            collection_name: None,
        }
    }

    fn state_with(songs: Vec<Song>) -> AppState {
        let mut s = AppState::new(true);
        s.view = crate::action::View::MoodDetail(MoodId(1));
        s.search.songs = Arc::new(songs);
        s
    }

    #[test]
    fn test_typing_emits_query_changes() {
        let s = state_with(vec![]);
        let mut c = SongSearch::new();
        assert!(matches!(
            c.handle_key(key(KeyCode::Char('/')), &s).as_slice(),
            [Action::OpenInput(InputMode::Search)]
        ));
        match c.handle_key(key(KeyCode::Char('a')), &s).as_slice() {
            [Action::QueryChanged(q)] => assert_eq!(q, "a"),
            other => panic!("unexpected {:?}", other),
        }
        match c.handle_key(key(KeyCode::Enter), &s).as_slice() {
            [Action::CloseInput, Action::SearchNow(q)] => assert_eq!(q, "a"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_sync_keeps_selection_until_new_results() {
        let mut s = state_with(vec![song(1, None), song(2, None)]);
        let mut c = SongSearch::new();
        assert!(c.sync_results(&s));
        c.handle_key(key(KeyCode::Char('j')), &s);

        s.search.phase = SearchPhase::Fetching;
        assert!(!c.sync_results(&s));
        assert_eq!(c.selected_song().map(|x| x.track_id), Some(2));

        s.search.songs = Arc::new(vec![song(3, None)]);
        assert!(c.sync_results(&s));
        assert_eq!(c.selected_song().map(|x| x.track_id), Some(3));
    }

    #[test]
    fn test_enter_adds_or_reports_existing_favorite() {
        let mut s = state_with(vec![song(7, None)]);
        let mut c = SongSearch::new();
        c.sync_results(&s);
        assert!(matches!(
            c.handle_key(key(KeyCode::Enter), &s).as_slice(),
            [Action::AddFavorite(x)] if x.track_id == 7
        ));

        s.favorites = vec![song(7, None)];
        assert!(matches!(
            c.handle_key(key(KeyCode::Char('+')), &s).as_slice(),
            [Action::Notify(_)]
        ));
    }

    #[test]
    fn test_copy_preview_url() {
        let s = state_with(vec![song(1, Some("https://p/1.m4a")), song(2, None)]);
        let mut c = SongSearch::new();
        c.sync_results(&s);
        match c.handle_key(key(KeyCode::Char('y')), &s).as_slice() {
            [Action::CopyToClipboard(url)] => assert_eq!(url, "https://p/1.m4a"),
            other => panic!("unexpected {:?}", other),
        }
        c.handle_key(key(KeyCode::Down), &s);
        assert!(matches!(
            c.handle_key(key(KeyCode::Char('y')), &s).as_slice(),
            [Action::Notify(_)]
        ));
    }

    #[test]
    fn test_opening_a_mood_clears_the_query_box() {
        let s = state_with(vec![]);
        let mut c = SongSearch::new();
        c.handle_key(key(KeyCode::Char('/')), &s);
        c.handle_key(key(KeyCode::Char('x')), &s);
        c.on_action(&Action::OpenMood(MoodId(2)), &s);
        assert!(c.query_input.is_empty());
        assert!(!c.query_input.is_active());
    }
}
