//! Key-value snapshot persistence.
//!
//! Every collection is stored as one JSON value under a string key. The
//! store itself is synchronous; callers treat a read failure the same as a
//! missing key and report write failures without undoing in-memory state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::StoreError;

pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

// ── FileStore ─────────────────────────────────────────────────────────────────

/// One `<key>.json` file per key inside `dir`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::io("<root>", e))?;
        debug!("[kv] file store at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }
}

/// Map a key onto a safe file name. Letters (any script), digits, `-` and
/// `_` pass through; everything else becomes `_`.
fn file_stem(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        // Write-then-rename: a reader never observes a half-written snapshot.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|e| StoreError::io(key, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| StoreError::io(key, e))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }
}

// ── MemoryStore ───────────────────────────────────────────────────────────────

/// In-process store. Clones share the same map, so a handle kept aside
/// sees everything written through another clone.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.lock().remove(key);
        Ok(())
    }
}

// ── Snapshots ─────────────────────────────────────────────────────────────────

/// Result of a tolerant snapshot read.
#[derive(Debug, PartialEq)]
pub enum Snapshot<T> {
    Loaded(T),
    Missing,
    Corrupt,
}

impl<T> Snapshot<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Loaded(v) => Some(v),
            Self::Missing | Self::Corrupt => None,
        }
    }
}

/// Read and decode `key`. Never fails: unreadable or unparsable values are
/// logged and reported as `Corrupt`.
pub fn load_snapshot<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Snapshot<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Snapshot::Missing,
        Err(e) => {
            warn!("[kv] read {} failed: {}", key, e);
            return Snapshot::Corrupt;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(v) => Snapshot::Loaded(v),
        Err(e) => {
            warn!("[kv] {} holds malformed JSON, ignoring: {}", key, e);
            Snapshot::Corrupt
        }
    }
}

pub fn save_snapshot<T: Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem_sanitizes() {
        assert_eq!(file_stem("moodify-moods"), "moodify-moods");
        assert_eq!(file_stem("moodSongs-üzgün"), "moodSongs-üzgün");
        assert_eq!(file_stem("../etc/passwd"), "___etc_passwd");
        assert_eq!(file_stem("a b.c"), "a_b_c");
    }

    #[test]
    fn test_file_store_set_get_remove() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(tmp.path().join("nested")).unwrap();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "[1,2]").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[1,2]"));
        assert!(!store.dir().join("k.json.tmp").exists());

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_memory_store_clones_share_entries() {
        let mut a = MemoryStore::new();
        let b = a.clone();
        a.set("x", "1").unwrap();
        assert!(b.contains("x"));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_load_snapshot_variants() {
        let mut store = MemoryStore::new();
        assert_eq!(load_snapshot::<Vec<u32>>(&store, "n"), Snapshot::Missing);

        store.set("n", "{not json").unwrap();
        assert_eq!(load_snapshot::<Vec<u32>>(&store, "n"), Snapshot::Corrupt);

        save_snapshot(&mut store, "n", &vec![3u32, 4]).unwrap();
        assert_eq!(load_snapshot::<Vec<u32>>(&store, "n"), Snapshot::Loaded(vec![3, 4]));
    }
}
