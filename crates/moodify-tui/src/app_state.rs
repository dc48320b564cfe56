//! AppState: shared read-only data passed to all components during render/event.
//!
//! The App event-loop is the only writer. Mood and favorites data are copies
//! refreshed from the MoodStore whenever it reports a change; `search` is the
//! latest value observed on the coordinator's watch channel.

use std::collections::HashMap;

use moodify_core::coordinator::SearchState;
use moodify_core::models::{Mood, MoodId, Song, TrackId};

use crate::action::View;
use crate::widgets::status_bar::InputMode;

pub struct AppState {
    pub view: View,
    pub input_mode: InputMode,

    // ── Store ────────────────────────────────────────────────────────────────
    pub moods: Vec<Mood>,
    /// Favorites of the mood shown in `MoodDetail` (empty otherwise).
    pub favorites: Vec<Song>,
    pub favorite_counts: HashMap<MoodId, usize>,
    pub store_revision: u64,
    /// `true` when running on an in-memory store (`--ephemeral`).
    pub ephemeral: bool,

    // ── Search ───────────────────────────────────────────────────────────────
    pub search: SearchState,
}

impl AppState {
    pub fn new(ephemeral: bool) -> Self {
        Self {
            view: View::MoodSelect,
            input_mode: InputMode::Normal,
            moods: Vec::new(),
            favorites: Vec::new(),
            favorite_counts: HashMap::new(),
            store_revision: 0,
            ephemeral,
            search: SearchState::default(),
        }
    }

    pub fn current_mood_id(&self) -> Option<MoodId> {
        match self.view {
            View::MoodDetail(id) => Some(id),
            View::MoodSelect => None,
        }
    }

    pub fn current_mood(&self) -> Option<&Mood> {
        let id = self.current_mood_id()?;
        self.moods.iter().find(|m| m.id == id)
    }

    pub fn is_favorite(&self, track_id: TrackId) -> bool {
        self.favorites.iter().any(|s| s.track_id == track_id)
    }
}
