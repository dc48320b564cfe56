//! MoodStore over a real on-disk FileStore: sessions are simulated by
//! dropping the store and reopening the same directory.

mod common;

use common::song;
use moodify_core::kv::{FileStore, KeyValueStore};
use moodify_core::models::{MoodId, MoodPatch};
use moodify_core::store::{favorites_key, MoodStore, StoreEvent, MOODS_KEY};

fn open(dir: &std::path::Path) -> MoodStore {
    MoodStore::open(Box::new(FileStore::open(dir).unwrap()))
}

#[test]
fn first_run_seeds_and_persists_on_first_write() {
    let tmp = tempfile::tempdir().unwrap();
    let mut store = open(tmp.path());
    let names: Vec<_> = store.moods().iter().map(|m| m.name.clone()).collect();
    assert_eq!(names, ["Mutlu", "Üzgün", "Sakin", "Enerjik"]);

    store.add_favorite(MoodId(3), song(7, "calm"));
    drop(store);

    let store = open(tmp.path());
    assert_eq!(store.favorites(MoodId(3)).len(), 1);
    assert_eq!(store.favorites(MoodId(3))[0].track_name, "calm");
}

#[test]
fn add_favorite_delete_mood_and_restart() {
    let tmp = tempfile::tempdir().unwrap();
    let mut store = open(tmp.path());

    let focus = store.add_mood("Focus").unwrap();
    assert!(store.add_favorite(focus, song(42, "deep work")));
    assert!(!store.add_favorite(focus, song(42, "deep work")));
    assert!(tmp.path().join(format!("{}.json", favorites_key(focus))).exists());

    drop(store);
    let mut store = open(tmp.path());
    assert_eq!(store.find_by_route("focus").map(|m| m.id), Some(focus));
    assert_eq!(store.favorites(focus).len(), 1);

    assert!(store.delete_mood(focus));
    assert!(!tmp.path().join(format!("{}.json", favorites_key(focus))).exists());

    drop(store);
    let store = open(tmp.path());
    assert!(store.mood(focus).is_none());
    assert!(store.favorites(focus).is_empty());
    assert_eq!(store.moods().len(), 4);
}

#[test]
fn malformed_moods_file_starts_empty_without_panicking() {
    let tmp = tempfile::tempdir().unwrap();
    {
        let mut kv = FileStore::open(tmp.path()).unwrap();
        kv.set(MOODS_KEY, "[{\"id\": 1, \"name\": ").unwrap();
    }
    let mut store = open(tmp.path());
    assert!(store.moods().is_empty());

    // Still fully usable; the next write replaces the broken snapshot.
    let id = store.add_mood("Yeni").unwrap();
    drop(store);
    let store = open(tmp.path());
    assert_eq!(store.moods().len(), 1);
    assert_eq!(store.moods()[0].id, id);
}

#[test]
fn malformed_favorites_file_only_loses_that_mood() {
    let tmp = tempfile::tempdir().unwrap();
    {
        let mut store = open(tmp.path());
        store.add_favorite(MoodId(1), song(1, "happy"));
        store.add_favorite(MoodId(2), song(2, "sad"));
    }
    std::fs::write(
        tmp.path().join(format!("{}.json", favorites_key(MoodId(1)))),
        "not json",
    )
    .unwrap();

    let store = open(tmp.path());
    assert!(store.favorites(MoodId(1)).is_empty());
    assert_eq!(store.favorites(MoodId(2)).len(), 1);
}

#[test]
fn legacy_files_are_migrated_on_open() {
    let tmp = tempfile::tempdir().unwrap();
    {
        let mut kv = FileStore::open(tmp.path()).unwrap();
        let songs = serde_json::to_string(&vec![song(5, "a"), song(5, "a"), song(6, "b")]).unwrap();
        kv.set("moodSongs-sakin", &songs).unwrap();
    }

    let store = open(tmp.path());
    let ids: Vec<_> = store.favorites(MoodId(3)).iter().map(|s| s.track_id).collect();
    assert_eq!(ids, [5, 6]);
    assert!(!tmp.path().join("moodSongs-sakin.json").exists());
    assert!(tmp.path().join("moodify-favorites-3.json").exists());
}

#[test]
fn edits_survive_restart_and_emit_events() {
    let tmp = tempfile::tempdir().unwrap();
    let mut store = open(tmp.path());
    let mut rx = store.subscribe();

    assert!(store.update_mood(
        MoodId(4),
        MoodPatch {
            name: Some("  Hype ".into()),
            description: Some("Yüksek tempo".into()),
            ..Default::default()
        },
    ));
    assert_eq!(rx.try_recv().unwrap(), StoreEvent::MoodsChanged);

    drop(store);
    let store = open(tmp.path());
    let mood = store.mood(MoodId(4)).unwrap();
    assert_eq!(mood.name, "Hype");
    assert_eq!(mood.description, "Yüksek tempo");
    assert!(store.find_by_route("HYPE").is_some());
}
