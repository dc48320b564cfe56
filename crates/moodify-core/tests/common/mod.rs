//! Shared fixtures for the moodify-core integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use moodify_core::error::SearchError;
use moodify_core::models::Song;
use moodify_core::search::{EffectiveQuery, SongSource};

pub fn song(id: u64, name: &str) -> Song {
    Song {
        track_id: id,
        track_name: name.to_string(),
        artist_name: "Test Artist".to_string(),
        artwork_url: format!("https://img.example/{}.jpg", id),
        preview_url: Some(format!("https://audio.example/{}.m4a", id)),
        collection_name: None,
    }
}

#[derive(Clone)]
struct Reply {
    delay: Duration,
    result: Result<Vec<Song>, u16>,
}

/// SongSource with a canned reply and latency per search term. Terms without
/// a script answer after 10ms with a single song named after the term.
#[derive(Default)]
pub struct ScriptedSource {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, term: &str, delay_ms: u64, songs: Vec<Song>) -> Self {
        self.replies.insert(
            term.to_string(),
            Reply {
                delay: Duration::from_millis(delay_ms),
                result: Ok(songs),
            },
        );
        self
    }

    pub fn fail(mut self, term: &str, delay_ms: u64, status: u16) -> Self {
        self.replies.insert(
            term.to_string(),
            Reply {
                delay: Duration::from_millis(delay_ms),
                result: Err(status),
            },
        );
        self
    }

    /// Terms searched so far, in issue order. `Popular` is logged as "".
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SongSource for ScriptedSource {
    async fn search(&self, query: &EffectiveQuery) -> Result<Vec<Song>, SearchError> {
        let term = query.term("").to_string();
        self.calls.lock().unwrap().push(term.clone());
        let reply = self.replies.get(&term).cloned().unwrap_or(Reply {
            delay: Duration::from_millis(10),
            result: Ok(vec![song(term.len() as u64 + 1000, &term)]),
        });
        tokio::time::sleep(reply.delay).await;
        reply.result.map_err(SearchError::Status)
    }
}
