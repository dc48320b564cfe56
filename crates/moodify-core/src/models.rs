//! Data model shared by the store, the search client and the UI.
//!
//! Field names on the wire match the snapshots written by the legacy web
//! front end (`desc`, `bgImage`) and the search provider (`trackId`,
//! `artworkUrl100`), so existing data loads without conversion.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable mood identifier. Serialized as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoodId(pub u64);

impl fmt::Display for MoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provider-assigned track identifier.
pub type TrackId = u64;

pub const NEW_MOOD_DESCRIPTION: &str = "Yeni bir his...";
pub const NEW_MOOD_BACKGROUND: &str = "/moods/happy.jpeg";
pub const NEW_MOOD_GRADIENT: &str = "from-purple-500/40 to-pink-500/40";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mood {
    pub id: MoodId,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "desc")]
    pub description: String,
    #[serde(default, rename = "bgImage")]
    pub background_image: String,
    #[serde(default)]
    pub gradient: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl Mood {
    /// A freshly created mood with the default presentation attributes.
    pub fn new(id: MoodId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: NEW_MOOD_DESCRIPTION.to_string(),
            background_image: NEW_MOOD_BACKGROUND.to_string(),
            gradient: NEW_MOOD_GRADIENT.to_string(),
            emoji: None,
        }
    }

    /// Routing key: the lower-cased name, matched case-insensitively.
    pub fn route_key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Partial update for a [`Mood`]; only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoodPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub background_image: Option<String>,
    pub gradient: Option<String>,
}

impl MoodPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.background_image.is_none()
            && self.gradient.is_none()
    }

    pub fn apply(self, mood: &mut Mood) {
        if let Some(v) = self.name {
            mood.name = v;
        }
        if let Some(v) = self.description {
            mood.description = v;
        }
        if let Some(v) = self.background_image {
            mood.background_image = v;
        }
        if let Some(v) = self.gradient {
            mood.gradient = v;
        }
    }
}

/// A search result, optionally copied into a favorites collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub track_id: TrackId,
    #[serde(default)]
    pub track_name: String,
    #[serde(default)]
    pub artist_name: String,
    #[serde(default, rename = "artworkUrl100")]
    pub artwork_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
}

impl Song {
    /// "Artist – Title", or just the title when the artist is unknown.
    pub fn display(&self) -> String {
        if self.artist_name.is_empty() {
            self.track_name.clone()
        } else {
            format!("{} \u{2013} {}", self.artist_name, self.track_name)
        }
    }
}

/// The moods seeded on first run, before anything has been persisted.
pub fn default_moods() -> Vec<Mood> {
    let seed = |id: u64, name: &str, desc: &str, bg: &str, gradient: &str| Mood {
        id: MoodId(id),
        name: name.to_string(),
        description: desc.to_string(),
        background_image: bg.to_string(),
        gradient: gradient.to_string(),
        emoji: None,
    };
    vec![
        seed(1, "Mutlu", "Enerjik ve pozitif", "/moods/happy.jpeg", "from-[#FFD978]/50 to-[#F6AD55]/50"),
        seed(2, "Üzgün", "Ağlamaklı", "/moods/sad.jpeg", "from-[#4A5568]/60 to-[#2D3748]/60"),
        seed(3, "Sakin", "Huzur arıyorum", "/moods/relax.jpeg", "from-[#1A202C]/60 to-[#2D31FA]/60"),
        seed(4, "Enerjik", "Hareket zamanı!", "/moods/enerjy.jpeg", "from-[#F6AD55]/50 to-[#E53E3E]/50"),
    ]
}
