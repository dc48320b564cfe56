//! Timing behaviour of the search coordinator, driven on tokio's paused
//! clock so every millisecond is deterministic.

mod common;

use std::time::Duration;

use common::{song, ScriptedSource};
use moodify_core::coordinator::{SearchCoordinator, SearchOutcome, SearchPhase};
use moodify_core::search::EffectiveQuery;
use tokio::time::sleep;

const QUIET: Duration = Duration::from_millis(500);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[tokio::test(start_paused = true)]
async fn rapid_typing_issues_one_search_for_last_text() {
    let mut c = SearchCoordinator::new(ScriptedSource::new(), QUIET);

    for text in ["b", "be", "bea", "beat"] {
        c.set_query(text);
        sleep(ms(100)).await;
    }
    // 400ms after the last keystroke: still quiet.
    sleep(ms(399)).await;
    assert_eq!(c.state().phase, SearchPhase::Debouncing);
    assert_eq!(c.state().generation, 0);

    sleep(ms(2)).await;
    assert_eq!(c.state().phase, SearchPhase::Fetching);

    sleep(ms(50)).await;
    let s = c.state();
    assert_eq!(s.phase, SearchPhase::Idle);
    assert_eq!(s.generation, 1);
    assert_eq!(s.songs[0].track_name, "beat");
}

#[tokio::test(start_paused = true)]
async fn no_search_before_quiet_period_elapses() {
    let mut c = SearchCoordinator::new(ScriptedSource::new(), QUIET);
    c.set_query("x");
    sleep(ms(499)).await;
    assert_eq!(c.state().generation, 0);
    sleep(ms(2)).await;
    assert_eq!(c.state().generation, 1);
}

#[tokio::test(start_paused = true)]
async fn slow_stale_response_never_overwrites_newer_one() {
    let source = ScriptedSource::new()
        .reply("slow", 800, vec![song(1, "slow")])
        .reply("fast", 50, vec![song(2, "fast")]);
    let mut c = SearchCoordinator::new(source, QUIET);

    c.set_query("slow");
    sleep(ms(510)).await; // gen 1 in flight until t=1310
    c.set_query("fast");
    sleep(ms(600)).await; // gen 2 issued at 1010, done at 1060

    let s = c.state();
    assert_eq!(s.generation, 2);
    assert_eq!(s.songs[0].track_name, "fast");
    assert_eq!(s.phase, SearchPhase::Idle);

    sleep(ms(400)).await; // slow reply lands now
    let s = c.state();
    assert_eq!(s.songs.len(), 1);
    assert_eq!(s.songs[0].track_name, "fast");
    assert_eq!(s.results_for, Some(EffectiveQuery::Text("fast".into())));
}

#[tokio::test(start_paused = true)]
async fn out_of_order_completion_publishes_latest_issued() {
    let source = ScriptedSource::new()
        .reply("first", 300, vec![song(1, "first")])
        .reply("second", 50, vec![song(2, "second")]);
    let c = SearchCoordinator::new(source, QUIET);

    let a = c.execute_search(EffectiveQuery::Text("first".into()));
    let b = c.execute_search(EffectiveQuery::Text("second".into()));

    assert_eq!(b.await.unwrap(), SearchOutcome::Published(1));
    assert_eq!(a.await.unwrap(), SearchOutcome::DiscardedStale);
    assert_eq!(c.state().songs[0].track_name, "second");
}

#[tokio::test(start_paused = true)]
async fn response_during_new_quiet_period_still_publishes() {
    let source = ScriptedSource::new().reply("a", 100, vec![song(1, "a")]);
    let mut c = SearchCoordinator::new(source, QUIET);

    c.set_query("a");
    sleep(ms(550)).await; // gen 1 issued at 500, replies at 600
    c.set_query("ab");
    sleep(ms(100)).await;

    let s = c.state();
    assert_eq!(s.songs[0].track_name, "a");
    assert_eq!(s.phase, SearchPhase::Debouncing);
    assert!(!s.is_loading());
}

#[tokio::test(start_paused = true)]
async fn typing_during_fetch_keeps_loading_until_reply() {
    let source = ScriptedSource::new().reply("slow", 300, vec![song(1, "slow")]);
    let mut c = SearchCoordinator::new(source, QUIET);

    c.set_query("slow");
    sleep(ms(550)).await; // gen 1 issued at 500, replies at 800
    c.set_query("slowe");
    let s = c.state();
    assert_eq!(s.phase, SearchPhase::Debouncing);
    assert!(s.is_loading());

    sleep(ms(260)).await; // gen 1 lands at 800
    let s = c.state();
    assert_eq!(s.songs[0].track_name, "slow");
    assert_eq!(s.phase, SearchPhase::Debouncing);
    assert!(!s.is_loading());
}

#[tokio::test(start_paused = true)]
async fn failure_keeps_previous_results_and_clears_loading() {
    let source = ScriptedSource::new()
        .reply("rock", 20, vec![song(1, "r1"), song(2, "r2"), song(3, "r3")])
        .fail("down", 20, 500);
    let mut c = SearchCoordinator::new(source, QUIET);

    c.set_query("rock");
    sleep(ms(600)).await;
    assert_eq!(c.state().songs.len(), 3);

    c.set_query("down");
    sleep(ms(600)).await;
    let s = c.state();
    assert_eq!(s.songs.len(), 3);
    assert_eq!(s.phase, SearchPhase::Idle);
    assert!(s.last_error.is_some());
    assert_eq!(s.query, "down");
}

#[tokio::test(start_paused = true)]
async fn clearing_the_box_searches_popular() {
    let mut c = SearchCoordinator::new(ScriptedSource::new(), QUIET);
    c.set_query("abc");
    sleep(ms(100)).await;
    c.set_query("   ");
    sleep(ms(600)).await;

    let s = c.state();
    assert_eq!(s.effective, Some(EffectiveQuery::Popular));
    assert_eq!(s.generation, 1);
}

#[tokio::test(start_paused = true)]
async fn watch_subscriber_observes_loading_then_results() {
    let mut c = SearchCoordinator::new(ScriptedSource::new(), QUIET);
    let mut rx = c.subscribe();

    let handle = c.search_now("live");
    assert!(rx.borrow_and_update().is_loading());

    assert_eq!(handle.await.unwrap(), SearchOutcome::Published(1));
    rx.changed().await.unwrap();
    let s = rx.borrow_and_update().clone();
    assert!(!s.is_loading());
    assert_eq!(s.songs[0].track_name, "live");
}
