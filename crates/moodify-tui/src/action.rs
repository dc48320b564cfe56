//! Action enum: user intents and internal events.

use moodify_core::models::{MoodId, MoodPatch, Song, TrackId};

use crate::widgets::status_bar::InputMode;

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    MoodList,
    SongSearch,
    Favorites,
    HelpOverlay,
}

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    MoodSelect,
    MoodDetail(MoodId),
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    OpenMood(MoodId),
    RandomMood,
    Back,

    // ── Moods ────────────────────────────────────────────────────────────────
    AddMood(String),
    UpdateMood(MoodId, MoodPatch),
    DeleteMood(MoodId),

    // ── Search ───────────────────────────────────────────────────────────────
    QueryChanged(String),
    /// Skip the quiet period (Enter in the query box).
    SearchNow(String),

    // ── Favorites ────────────────────────────────────────────────────────────
    AddFavorite(Song),
    RemoveFavorite(TrackId),
    ClearFavorites,

    // ── Text input ───────────────────────────────────────────────────────────
    OpenInput(InputMode),
    CloseInput,

    // ── UI ───────────────────────────────────────────────────────────────────
    ToggleHelp,
    ToggleKeys,
    CopyToClipboard(String),
    Notify(String),

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
    Resize(u16, u16),
}
