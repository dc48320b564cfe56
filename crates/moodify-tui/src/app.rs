//! App: component-based event loop.
//!
//! Architecture:
//! - `App` owns all components, the `MoodStore`, the `SearchCoordinator` and
//!   `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background
//!   tasks: terminal input, search state changes and store notifications.
//! - The event loop draws each frame, then awaits the next message.
//! - Components return `Vec<Action>`; App dispatches each Action.

use std::io;
use std::time::Duration;

use rand::seq::SliceRandom;
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Paragraph},
    Terminal,
};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use moodify_core::coordinator::{SearchCoordinator, SearchPhase, SearchState};
use moodify_core::search::{EffectiveQuery, SongSource};
use moodify_core::store::{MoodStore, StoreEvent};

use crate::{
    action::{Action, ComponentId, View},
    app_state::AppState,
    component::Component,
    components::{
        favorites::Favorites, header::Header, help_overlay::HelpOverlay, mood_list::MoodList,
        song_search::SongSearch,
    },
    theme::{C_BG, C_MUTED},
    view::ViewManager,
    widgets::{
        status_bar::{self, InputMode},
        text::truncate_to_width,
        toast::{Severity, ToastManager},
    },
};

/// Below this width the detail view stacks its panes and collapses the
/// unfocused one to a summary line.
const NARROW_WIDTH: u16 = 70;

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    SearchUpdated(SearchState),
    Store(StoreEvent),
}

#[derive(Default, Clone)]
struct PaneAreas {
    mood_list: Rect,
    song_search: Rect,
    favorites: Rect,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App<S> {
    state: AppState,
    store: MoodStore,
    coordinator: SearchCoordinator<S>,
    vm: ViewManager,

    // ── Components ────────────────────────────────────────────────────────────
    header: Header,
    mood_list: MoodList,
    song_search: SongSearch,
    favorites: Favorites,
    help_overlay: HelpOverlay,
    toast: ToastManager,

    pane_areas: PaneAreas,
    /// Generation whose failure has already been toasted.
    reported_error_gen: Option<u64>,
    should_quit: bool,
}

impl<S: SongSource + 'static> App<S> {
    pub fn new(store: MoodStore, coordinator: SearchCoordinator<S>, ephemeral: bool) -> Self {
        let mut app = Self {
            state: AppState::new(ephemeral),
            store,
            coordinator,
            vm: ViewManager::new(),
            header: Header::new(),
            mood_list: MoodList::new(),
            song_search: SongSearch::new(),
            favorites: Favorites::new(),
            help_overlay: HelpOverlay::new(),
            toast: ToastManager::new(),
            pane_areas: PaneAreas::default(),
            reported_error_gen: None,
            should_quit: false,
        };
        app.sync_from_store();
        app
    }

    /// Open the mood whose name matches `route` (any case). Unknown names
    /// leave the selection screen up with a warning.
    pub fn open_route(&mut self, route: &str) {
        match self.store.find_by_route(route).map(|m| m.id) {
            Some(id) => self.dispatch(Action::OpenMood(id)),
            None => {
                warn!("[ui] no mood named {:?}", route);
                self.toast.notify(Severity::Warning, format!("no mood named {:?}", route));
            }
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(1024);

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Background task: search state (watch → AppMessage) ────────────────
        let search_tx = tx.clone();
        let mut search_rx = self.coordinator.subscribe();
        tokio::spawn(async move {
            while search_rx.changed().await.is_ok() {
                let snapshot = search_rx.borrow_and_update().clone();
                if search_tx.send(AppMessage::SearchUpdated(snapshot)).await.is_err() {
                    break;
                }
            }
        });

        // ── Background task: store notifications (broadcast → AppMessage) ─────
        let store_tx = tx.clone();
        let mut store_rx = self.store.subscribe();
        tokio::spawn(async move {
            loop {
                match store_rx.recv().await {
                    Ok(ev) => {
                        if store_tx.send(AppMessage::Store(ev)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("store receiver lagged by {} messages", n);
                        // A resync picks up whatever was missed.
                        if store_tx.send(AppMessage::Store(StoreEvent::MoodsChanged)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        drop(tx);

        // Toast expiry check + spinner animation: 100ms for smooth braille animation
        let mut toast_tick = tokio::time::interval(Duration::from_millis(100));
        toast_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        info!("[ui] started with {} moods", self.state.moods.len());

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    const MAX_DRAIN: usize = 256;
                    let mut redraw = self.handle_message(msg);
                    let mut drained = 0usize;
                    while drained < MAX_DRAIN {
                        let Ok(next) = rx.try_recv() else { break };
                        drained += 1;
                        redraw |= self.handle_message(next);
                    }
                    needs_redraw = redraw;
                }

                _ = toast_tick.tick() => {
                    let showing = !self.toast.is_empty();
                    self.toast.tick();
                    needs_redraw = showing;
                }
            }

            if self.should_quit {
                break;
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    /// Returns whether the frame needs redrawing.
    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return false;
                    }
                    for a in self.handle_key(key) {
                        self.dispatch(a);
                    }
                }
                Event::Mouse(mouse) => {
                    for a in self.handle_mouse(mouse) {
                        self.dispatch(a);
                    }
                }
                Event::Resize(w, h) => self.dispatch(Action::Resize(w, h)),
                _ => return false,
            },

            AppMessage::SearchUpdated(search) => self.on_search_updated(search),

            AppMessage::Store(StoreEvent::PersistFailed { key, error }) => {
                self.toast.notify(Severity::Warning, format!("could not save {}: {}", key, error));
            }
            AppMessage::Store(_) => {
                if self.store.revision() == self.state.store_revision {
                    return false;
                }
                self.sync_from_store();
            }
        }
        true
    }

    // ── State sync ────────────────────────────────────────────────────────────

    /// Copy moods and favorites out of the store. Falls back to the
    /// selection screen when the open mood no longer exists.
    fn sync_from_store(&mut self) {
        self.state.moods = self.store.moods().to_vec();
        self.state.favorite_counts = self
            .state
            .moods
            .iter()
            .map(|m| (m.id, self.store.favorites(m.id).len()))
            .collect();

        if let View::MoodDetail(id) = self.state.view {
            if self.store.mood(id).is_none() {
                info!("[ui] open mood {} disappeared, back to selection", id);
                self.set_view(View::MoodSelect);
            }
        }
        self.state.favorites = match self.state.current_mood_id() {
            Some(id) => self.store.favorites(id).to_vec(),
            None => Vec::new(),
        };
        self.state.store_revision = self.store.revision();

        self.mood_list.sync_moods(&self.state);
        self.favorites.sync_favorites(&self.state);
    }

    fn on_search_updated(&mut self, search: SearchState) {
        self.state.search = search;

        if self.state.search.is_loading() {
            let label = match &self.state.search.effective {
                Some(EffectiveQuery::Text(t)) => format!("searching {:?}…", t),
                _ => "loading popular songs…".to_string(),
            };
            self.toast.spinner(label);
        } else if self.toast.has_spinner() {
            self.toast.dismiss_spinner();
        }

        let failed = self.state.search.error_generation;
        if let (Some(generation), Some(err)) = (failed, self.state.search.last_error.as_deref()) {
            if self.reported_error_gen != Some(generation) {
                self.reported_error_gen = Some(generation);
                self.toast.notify(Severity::Warning, format!("search failed: {}", err));
            }
        }

        self.song_search.sync_results(&self.state);
    }

    fn set_view(&mut self, view: View) {
        self.vm.set_view(view);
        self.state.view = view;
        self.sync_input_mode();
    }

    fn sync_input_mode(&mut self) {
        // Components manage their own input state; we just reset mode here
        self.state.input_mode = InputMode::Normal;
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        let normal = self.state.input_mode == InputMode::Normal;

        // Global keys: always active regardless of focus/mode
        match key.code {
            KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => {
                return vec![Action::Quit];
            }
            KeyCode::Char('q') if key.modifiers == KeyModifiers::NONE && normal => {
                if !self.vm.show_help {
                    return vec![Action::Quit];
                }
            }
            KeyCode::Char('?') if normal && !self.vm.show_help => {
                return vec![Action::ToggleHelp];
            }
            _ => {}
        }

        // Help overlay captures all keys when visible
        if self.vm.show_help {
            let actions = self.help_overlay.handle_key(key, &self.state);
            if !actions.is_empty() {
                return actions;
            }
            return vec![Action::ToggleHelp];
        }

        // Tab / Shift-Tab always cycle focus, closing any open input first
        match key.code {
            KeyCode::Tab => {
                if !normal {
                    return vec![Action::CloseInput, Action::FocusNext];
                }
                return vec![Action::FocusNext];
            }
            KeyCode::BackTab => {
                if !normal {
                    return vec![Action::CloseInput, Action::FocusPrev];
                }
                return vec![Action::FocusPrev];
            }
            _ => {}
        }

        if normal {
            match key.code {
                KeyCode::Char('1') => {
                    self.vm.focus_nth(0);
                    return vec![];
                }
                KeyCode::Char('2') => {
                    self.vm.focus_nth(1);
                    return vec![];
                }
                KeyCode::Char('K') => return vec![Action::ToggleKeys],
                _ => {}
            }
        }

        // Dispatch to the focused component
        let s = &self.state;
        match self.vm.focused() {
            Some(ComponentId::MoodList) => self.mood_list.handle_key(key, s),
            Some(ComponentId::SongSearch) => self.song_search.handle_key(key, s),
            Some(ComponentId::Favorites) => self.favorites.handle_key(key, s),
            Some(ComponentId::HelpOverlay) => self.help_overlay.handle_key(key, s),
            None => vec![],
        }
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let is_click = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !is_click || self.vm.show_help {
            return vec![];
        }

        let col = event.column;
        let row = event.row;

        fn hit(r: Rect, col: u16, row: u16) -> bool {
            r.width > 0
                && r.height > 0
                && col >= r.x
                && col < r.x + r.width
                && row >= r.y
                && row < r.y + r.height
        }

        let areas = self.pane_areas.clone();
        let s = &self.state;
        let (id, actions) = if hit(areas.mood_list, col, row) {
            (
                ComponentId::MoodList,
                self.mood_list.handle_mouse(event, areas.mood_list, s),
            )
        } else if hit(areas.song_search, col, row) {
            (
                ComponentId::SongSearch,
                self.song_search.handle_mouse(event, areas.song_search, s),
            )
        } else if hit(areas.favorites, col, row) {
            (
                ComponentId::Favorites,
                self.favorites.handle_mouse(event, areas.favorites, s),
            )
        } else {
            return vec![];
        };

        // Focus follows the click
        if self.vm.focused() != Some(id) {
            self.vm.focus_set(id);
        }
        actions
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        // Broadcast action to all components first
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.mood_list.on_action(&action, s));
            out.extend(self.song_search.on_action(&action, s));
            out.extend(self.favorites.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action);

        // Secondary actions are depth-limited to 1 level
        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        match &action {
            Action::Resize(_, _) => {}
            _ => debug!("apply_action: {:?}", action),
        }
        match action {
            // ── Navigation ────────────────────────────────────────────────────
            Action::FocusNext => {
                self.vm.focus_next();
                self.sync_input_mode();
            }
            Action::FocusPrev => {
                self.vm.focus_prev();
                self.sync_input_mode();
            }
            Action::OpenMood(id) => {
                if self.store.mood(id).is_none() {
                    self.toast.notify(Severity::Warning, "that mood no longer exists");
                    return;
                }
                self.set_view(View::MoodDetail(id));
                self.sync_from_store();
                // A fresh screen starts from the popular listing.
                drop(self.coordinator.search_now(""));
            }
            Action::RandomMood => {
                let picked = self
                    .store
                    .moods()
                    .choose(&mut rand::thread_rng())
                    .map(|m| m.id);
                if let Some(id) = picked {
                    self.dispatch(Action::OpenMood(id));
                }
            }
            Action::Back => {
                if let Some(id) = self.state.current_mood_id() {
                    self.mood_list.select_mood(id);
                }
                self.set_view(View::MoodSelect);
                self.sync_from_store();
            }

            // ── Moods ─────────────────────────────────────────────────────────
            Action::AddMood(name) => match self.store.add_mood(&name) {
                Some(id) => {
                    self.sync_from_store();
                    self.mood_list.select_mood(id);
                    self.toast.notify(Severity::Success, format!("added mood {}", name.trim()));
                }
                None => self.toast.notify(Severity::Warning, "a mood needs a name"),
            },
            Action::UpdateMood(id, patch) => {
                if self.store.update_mood(id, patch) {
                    self.sync_from_store();
                }
            }
            Action::DeleteMood(id) => {
                let name = self.store.mood(id).map(|m| m.name.clone());
                if self.store.delete_mood(id) {
                    self.sync_from_store();
                    self.toast.notify(Severity::Info, format!("deleted {}", name.unwrap_or_default()));
                }
            }

            // ── Search ────────────────────────────────────────────────────────
            Action::QueryChanged(text) => self.coordinator.set_query(text),
            Action::SearchNow(text) => drop(self.coordinator.search_now(text)),

            // ── Favorites ─────────────────────────────────────────────────────
            Action::AddFavorite(song) => {
                let Some(id) = self.state.current_mood_id() else {
                    return;
                };
                let title = song.track_name.clone();
                if self.store.add_favorite(id, song) {
                    self.sync_from_store();
                    self.toast.notify(Severity::Success, format!("♥ {}", title));
                } else {
                    self.toast.notify(Severity::Info, format!("already a favorite: {}", title));
                }
            }
            Action::RemoveFavorite(track_id) => {
                if let Some(id) = self.state.current_mood_id() {
                    if self.store.remove_favorite(id, track_id) {
                        self.sync_from_store();
                    }
                }
            }
            Action::ClearFavorites => {
                if let Some(id) = self.state.current_mood_id() {
                    if self.store.clear_favorites(id) {
                        self.sync_from_store();
                        self.toast.notify(Severity::Info, "favorites cleared");
                    }
                }
            }

            // ── Text input ────────────────────────────────────────────────────
            Action::OpenInput(mode) => self.state.input_mode = mode,
            Action::CloseInput => self.state.input_mode = InputMode::Normal,

            // ── UI ────────────────────────────────────────────────────────────
            Action::ToggleHelp => {
                self.vm.show_help = !self.vm.show_help;
            }
            Action::ToggleKeys => {
                self.vm.show_keys_bar = !self.vm.show_keys_bar;
            }
            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        self.toast
                            .notify(Severity::Success, format!("copied: {}", truncate_to_width(&text, 40)));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.notify(Severity::Error, format!("clipboard error: {}", e));
                    }
                }
            }
            Action::Notify(msg) => self.toast.notify(Severity::Info, msg),

            // ── System ────────────────────────────────────────────────────────
            Action::Quit => {
                info!("[ui] quit requested");
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();

        // Fill the entire terminal with the base background colour so gaps
        // between panes don't show the terminal default.
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        // ── Outer layout: header | body | (statusbar) ─────────────────────────
        let status_h = if self.vm.show_keys_bar { 1u16 } else { 0 };
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(status_h),
            ])
            .split(area);
        let (header_area, body_area, status_area) = (outer[0], outer[1], outer[2]);

        self.header.draw(frame, header_area, &self.state);

        if self.vm.show_keys_bar {
            status_bar::draw_keys_bar(
                frame,
                status_area,
                self.state.input_mode,
                self.state.view,
                self.status_note(),
            );
        }

        self.pane_areas = PaneAreas::default();
        match self.state.view {
            View::MoodSelect => {
                let focused = self.vm.focus.is_focused(ComponentId::MoodList);
                self.mood_list.draw(frame, body_area, focused, &self.state);
                self.pane_areas.mood_list = body_area;
            }
            View::MoodDetail(_) => self.draw_detail(frame, body_area),
        }

        // ── Help overlay (on top of everything) ──────────────────────────────
        if self.vm.show_help {
            self.help_overlay.draw(frame, area, false, &self.state);
        }

        // ── Toast notifications (topmost layer) ──────────────────────────────
        self.toast.draw(frame, area);
    }

    fn draw_detail(&mut self, frame: &mut ratatui::Frame, area: Rect) {
        let search_focused = self.vm.focus.is_focused(ComponentId::SongSearch);
        let favorites_focused = self.vm.focus.is_focused(ComponentId::Favorites);

        if area.width >= NARROW_WIDTH {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(area);
            self.song_search.draw(frame, cols[0], search_focused, &self.state);
            self.favorites.draw(frame, cols[1], favorites_focused, &self.state);
            self.pane_areas.song_search = cols[0];
            self.pane_areas.favorites = cols[1];
            return;
        }

        // Narrow: focused pane fills the body, the other shrinks to one line.
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(if favorites_focused {
                [Constraint::Length(1), Constraint::Min(0)]
            } else {
                [Constraint::Min(0), Constraint::Length(1)]
            })
            .split(area);
        let (search_area, favorites_area) = (rows[0], rows[1]);

        if favorites_focused {
            self.draw_summary(frame, search_area, ComponentId::SongSearch);
            self.favorites.draw(frame, favorites_area, true, &self.state);
        } else {
            self.song_search.draw(frame, search_area, search_focused, &self.state);
            self.draw_summary(frame, favorites_area, ComponentId::Favorites);
        }
        self.pane_areas.song_search = search_area;
        self.pane_areas.favorites = favorites_area;
    }

    fn draw_summary(&self, frame: &mut ratatui::Frame, area: Rect, id: ComponentId) {
        let summary = match id {
            ComponentId::SongSearch => self.song_search.collapse_summary(&self.state),
            ComponentId::Favorites => self.favorites.collapse_summary(&self.state),
            ComponentId::MoodList => self.mood_list.collapse_summary(&self.state),
            ComponentId::HelpOverlay => None,
        };
        let text = format!(" ▸ {}", summary.unwrap_or_default());
        frame.render_widget(
            Paragraph::new(Span::styled(
                truncate_to_width(&text, area.width as usize),
                Style::default().fg(C_MUTED),
            )),
            area,
        );
    }

    fn status_note(&self) -> Option<&'static str> {
        if self.state.search.is_loading() {
            return Some("searching…");
        }
        match self.state.search.phase {
            SearchPhase::Debouncing => Some("typing…"),
            SearchPhase::Fetching => Some("searching…"),
            SearchPhase::Idle if self.state.ephemeral => Some("ephemeral: nothing is saved"),
            SearchPhase::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use moodify_core::error::SearchError;
    use moodify_core::kv::MemoryStore;
    use moodify_core::models::{MoodId, Song};

    /// Answers every query with one song named after the term; "boom" fails.
    struct EchoSource;

    #[async_trait]
    impl SongSource for EchoSource {
        async fn search(&self, query: &EffectiveQuery) -> Result<Vec<Song>, SearchError> {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let term = match query {
                EffectiveQuery::Popular => "popular".to_string(),
                EffectiveQuery::Text(t) if t == "boom" => return Err(SearchError::Status(500)),
                EffectiveQuery::Text(t) => t.clone(),
            };
            Ok(vec![Song {
                track_id: term.len() as u64,
                track_name: term,
                artist_name: "echo".into(),
                artwork_url: String::new(),
                preview_url: None,
                collection_name: None,
            }])
        }
    }

    fn app() -> App<EchoSource> {
        let store = MoodStore::open(Box::new(MemoryStore::new()));
        let coordinator = SearchCoordinator::new(EchoSource, Duration::from_millis(500));
        App::new(store, coordinator, true)
    }

    async fn settle(app: &mut App<EchoSource>) {
        tokio::time::sleep(Duration::from_millis(600)).await;
        let search = app.coordinator.state();
        app.on_search_updated(search);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_mood_loads_popular_songs() {
        let mut app = app();
        assert_eq!(app.state.moods.len(), 4);

        app.dispatch(Action::OpenMood(MoodId(2)));
        assert_eq!(app.state.view, View::MoodDetail(MoodId(2)));
        assert_eq!(app.vm.focused(), Some(ComponentId::SongSearch));

        settle(&mut app).await;
        assert_eq!(app.state.search.results_for, Some(EffectiveQuery::Popular));
        assert_eq!(app.song_search.list.len(), 1);
        assert!(!app.toast.has_spinner());
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_route_is_case_insensitive() {
        let mut app = app();
        app.open_route("SAKIN");
        assert_eq!(app.state.view, View::MoodDetail(MoodId(3)));

        app.dispatch(Action::Back);
        app.open_route("nope");
        assert_eq!(app.state.view, View::MoodSelect);
    }

    #[tokio::test(start_paused = true)]
    async fn test_favorites_dedup_and_count() {
        let mut app = app();
        app.dispatch(Action::OpenMood(MoodId(1)));
        settle(&mut app).await;

        let song = app.state.search.songs[0].clone();
        app.dispatch(Action::AddFavorite(song.clone()));
        app.dispatch(Action::AddFavorite(song.clone()));
        assert_eq!(app.state.favorites.len(), 1);
        assert_eq!(app.state.favorite_counts.get(&MoodId(1)), Some(&1));
        assert!(app.state.is_favorite(song.track_id));

        app.dispatch(Action::RemoveFavorite(song.track_id));
        assert!(app.state.favorites.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deleting_open_mood_returns_to_selection() {
        let mut app = app();
        app.dispatch(Action::OpenMood(MoodId(4)));
        app.dispatch(Action::DeleteMood(MoodId(4)));
        assert_eq!(app.state.view, View::MoodSelect);
        assert_eq!(app.state.moods.len(), 3);
        assert!(app.state.favorites.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_search_warns_once_and_keeps_results() {
        let mut app = app();
        app.dispatch(Action::OpenMood(MoodId(1)));
        settle(&mut app).await;

        app.dispatch(Action::QueryChanged("boom".into()));
        settle(&mut app).await;
        let failed = app.state.search.generation;
        assert!(app.state.search.last_error.is_some());
        assert_eq!(app.reported_error_gen, Some(failed));
        assert_eq!(app.state.search.results_for, Some(EffectiveQuery::Popular));
        assert_eq!(app.song_search.list.len(), 1);

        // The next search is in flight while the old error is still set.
        app.dispatch(Action::QueryChanged("fine".into()));
        tokio::time::sleep(Duration::from_millis(505)).await;
        let search = app.coordinator.state();
        assert!(search.is_loading());
        assert_eq!(search.generation, failed + 1);
        assert!(search.last_error.is_some());
        app.on_search_updated(search);
        assert_eq!(app.reported_error_gen, Some(failed));

        tokio::time::sleep(Duration::from_millis(20)).await;
        let search = app.coordinator.state();
        app.on_search_updated(search);
        assert!(app.state.search.last_error.is_none());
        assert_eq!(app.reported_error_gen, Some(failed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_random_mood_opens_an_existing_mood() {
        let mut app = app();
        app.dispatch(Action::RandomMood);
        let id = app.state.current_mood_id().expect("a mood is open");
        assert!(app.state.moods.iter().any(|m| m.id == id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_mood_rejects_blank_names() {
        let mut app = app();
        app.dispatch(Action::AddMood("   ".into()));
        assert_eq!(app.state.moods.len(), 4);
        app.dispatch(Action::AddMood("Odak".into()));
        assert_eq!(app.state.moods.len(), 5);
        assert_eq!(app.mood_list.selected_id(), app.state.moods.last().map(|m| m.id));
    }
}
