//! MoodStore: the mood collection plus one favorites collection per mood.
//!
//! The in-memory view is authoritative. Every mutation writes the affected
//! snapshot through the [`KeyValueStore`] before returning; a failed write is
//! logged and broadcast as [`StoreEvent::PersistFailed`] but the mutation
//! itself stands.
//!
//! Persisted keys:
//!
//!   moodify-moods              JSON array of moods
//!   moodify-favorites-<id>     JSON array of songs, insertion order
//!
//! Favorites written by the legacy web front end under `moodSongs-<name>` are
//! moved to the id key when the store opens.

use std::collections::HashMap;

use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::kv::{load_snapshot, save_snapshot, KeyValueStore, Snapshot};
use crate::models::{default_moods, Mood, MoodId, MoodPatch, Song, TrackId};

pub const MOODS_KEY: &str = "moodify-moods";
const FAVORITES_PREFIX: &str = "moodify-favorites-";
const LEGACY_FAVORITES_PREFIX: &str = "moodSongs-";

pub fn favorites_key(id: MoodId) -> String {
    format!("{}{}", FAVORITES_PREFIX, id)
}

pub fn legacy_favorites_key(route_key: &str) -> String {
    format!("{}{}", LEGACY_FAVORITES_PREFIX, route_key)
}

/// Change notifications for subscribers (the UI re-renders on these).
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    MoodsChanged,
    FavoritesChanged(MoodId),
    PersistFailed { key: String, error: String },
}

pub struct MoodStore {
    kv: Box<dyn KeyValueStore>,
    moods: Vec<Mood>,
    favorites: HashMap<MoodId, Vec<Song>>,
    rev: u64,
    events: broadcast::Sender<StoreEvent>,
}

impl MoodStore {
    /// Load the mood collection and every mood's favorites.
    ///
    /// A missing mood snapshot seeds the default moods; a corrupt one starts
    /// empty. Neither case fails.
    pub fn open(kv: Box<dyn KeyValueStore>) -> Self {
        let moods = match load_snapshot::<Vec<Mood>>(kv.as_ref(), MOODS_KEY) {
            Snapshot::Loaded(moods) => moods,
            Snapshot::Missing => {
                info!("[store] no saved moods, seeding defaults");
                default_moods()
            }
            Snapshot::Corrupt => Vec::new(),
        };

        let (events, _) = broadcast::channel(256);
        let mut store = Self {
            kv,
            moods,
            favorites: HashMap::new(),
            rev: 1,
            events,
        };

        let ids: Vec<(MoodId, String)> =
            store.moods.iter().map(|m| (m.id, m.route_key())).collect();
        for (id, route_key) in ids {
            let songs = store.load_favorites(id, &route_key);
            store.favorites.insert(id, songs);
        }
        info!(
            "[store] opened: {} moods, {} favorites",
            store.moods.len(),
            store.favorites.values().map(Vec::len).sum::<usize>()
        );
        store
    }

    fn load_favorites(&mut self, id: MoodId, route_key: &str) -> Vec<Song> {
        let key = favorites_key(id);
        match load_snapshot::<Vec<Song>>(self.kv.as_ref(), &key) {
            Snapshot::Loaded(songs) => return songs,
            Snapshot::Corrupt => return Vec::new(),
            Snapshot::Missing => {}
        }

        let legacy = legacy_favorites_key(route_key);
        let Some(songs) = load_snapshot::<Vec<Song>>(self.kv.as_ref(), &legacy).into_option()
        else {
            return Vec::new();
        };
        let songs = dedup_by_track(songs);
        info!(
            "[store] migrating {} favorites from {} to {}",
            songs.len(),
            legacy,
            key
        );
        if self.write(&key, &songs) {
            if let Err(e) = self.kv.remove(&legacy) {
                warn!("[store] could not remove legacy key {}: {}", legacy, e);
            }
        }
        songs
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.rev
    }

    // ── Moods ─────────────────────────────────────────────────────────────────

    pub fn moods(&self) -> &[Mood] {
        &self.moods
    }

    pub fn mood(&self, id: MoodId) -> Option<&Mood> {
        self.moods.iter().find(|m| m.id == id)
    }

    /// Resolve a route key (mood name, any case). When several moods share
    /// a name the last one wins.
    pub fn find_by_route(&self, key: &str) -> Option<&Mood> {
        let key = key.to_lowercase();
        self.moods.iter().rev().find(|m| m.route_key() == key)
    }

    /// Append a new mood. Blank names are ignored and return `None`.
    pub fn add_mood(&mut self, name: &str) -> Option<MoodId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let id = self.next_id();
        self.moods.push(Mood::new(id, name));
        self.favorites.insert(id, Vec::new());
        info!("[store] added mood {} {:?}", id, name);
        self.commit_moods();
        Some(id)
    }

    /// Merge `patch` into the mood with `id`. A blank name in the patch is
    /// dropped so a mood can never lose its label.
    pub fn update_mood(&mut self, id: MoodId, mut patch: MoodPatch) -> bool {
        let Some(mood) = self.moods.iter_mut().find(|m| m.id == id) else {
            debug!("[store] update_mood: {} not found", id);
            return false;
        };
        if patch.name.as_deref().map(|n| n.trim().is_empty()).unwrap_or(false) {
            patch.name = None;
        }
        patch.name = patch.name.map(|n| n.trim().to_string());
        patch.apply(mood);
        info!("[store] updated mood {}", id);
        self.commit_moods();
        true
    }

    /// Remove the mood and its favorites collection, both in memory and on
    /// disk.
    pub fn delete_mood(&mut self, id: MoodId) -> bool {
        let Some(pos) = self.moods.iter().position(|m| m.id == id) else {
            return false;
        };
        let mood = self.moods.remove(pos);
        self.favorites.remove(&id);
        info!("[store] deleted mood {} {:?}", id, mood.name);
        self.commit_moods();

        let key = favorites_key(id);
        if let Err(e) = self.kv.remove(&key) {
            self.report_failure(&key, e.to_string());
        }
        self.publish(StoreEvent::FavoritesChanged(id));
        true
    }

    fn next_id(&self) -> MoodId {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        match self.moods.iter().map(|m| m.id.0).max() {
            Some(max) if now <= max => MoodId(max + 1),
            _ => MoodId(now),
        }
    }

    // ── Favorites ─────────────────────────────────────────────────────────────

    /// Favorites for `id` in insertion order; empty for unknown moods.
    pub fn favorites(&self, id: MoodId) -> &[Song] {
        self.favorites.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_favorite(&self, id: MoodId, track_id: TrackId) -> bool {
        self.favorites(id).iter().any(|s| s.track_id == track_id)
    }

    /// Append `song` unless a song with the same track id is already present.
    pub fn add_favorite(&mut self, id: MoodId, song: Song) -> bool {
        if self.mood(id).is_none() {
            return false;
        }
        let songs = self.favorites.entry(id).or_default();
        if songs.iter().any(|s| s.track_id == song.track_id) {
            debug!("[store] {} already favorite in {}", song.track_id, id);
            return false;
        }
        info!("[store] favorite + {} {:?} in {}", song.track_id, song.track_name, id);
        songs.push(song);
        self.commit_favorites(id);
        true
    }

    pub fn remove_favorite(&mut self, id: MoodId, track_id: TrackId) -> bool {
        let Some(songs) = self.favorites.get_mut(&id) else {
            return false;
        };
        let Some(pos) = songs.iter().position(|s| s.track_id == track_id) else {
            return false;
        };
        songs.remove(pos);
        info!("[store] favorite - {} in {}", track_id, id);
        self.commit_favorites(id);
        true
    }

    pub fn clear_favorites(&mut self, id: MoodId) -> bool {
        match self.favorites.get_mut(&id) {
            Some(songs) if !songs.is_empty() => songs.clear(),
            _ => return false,
        }
        info!("[store] cleared favorites of {}", id);
        self.commit_favorites(id);
        true
    }

    // ── Persistence ───────────────────────────────────────────────────────────

    fn commit_moods(&mut self) {
        self.rev += 1;
        let moods = std::mem::take(&mut self.moods);
        self.write(MOODS_KEY, &moods);
        self.moods = moods;
        self.publish(StoreEvent::MoodsChanged);
    }

    fn commit_favorites(&mut self, id: MoodId) {
        self.rev += 1;
        let songs = self.favorites.remove(&id).unwrap_or_default();
        self.write(&favorites_key(id), &songs);
        self.favorites.insert(id, songs);
        self.publish(StoreEvent::FavoritesChanged(id));
    }

    /// Returns `true` when the snapshot reached the backing store.
    fn write<T: serde::Serialize + ?Sized>(&mut self, key: &str, value: &T) -> bool {
        match save_snapshot(self.kv.as_mut(), key, value) {
            Ok(()) => true,
            Err(e) => {
                self.report_failure(key, e.to_string());
                false
            }
        }
    }

    fn report_failure(&self, key: &str, error: String) {
        error!("[store] persist {} failed: {}", key, error);
        self.publish(StoreEvent::PersistFailed {
            key: key.to_string(),
            error,
        });
    }

    fn publish(&self, event: StoreEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

fn dedup_by_track(songs: Vec<Song>) -> Vec<Song> {
    let mut out: Vec<Song> = Vec::with_capacity(songs.len());
    for song in songs {
        if !out.iter().any(|s| s.track_id == song.track_id) {
            out.push(song);
        }
    }
    out
}
