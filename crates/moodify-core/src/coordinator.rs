//! SearchCoordinator: debounced search-as-you-type with stale-response
//! suppression.
//!
//! # States
//! ```text
//!  Idle ──set_query──▶ Debouncing ──timer──▶ Fetching ──▶ Idle
//!                          ▲                    │
//!                          └─────set_query──────┘
//! ```
//!
//! Every issued request takes the next generation number. When a response
//! arrives it may only publish if its generation is still the latest one
//! issued; otherwise it is dropped. Requests are never aborted: a fetch that
//! has left the timer keeps running after a new keystroke and is simply
//! ignored if it loses the race.
//!
//! The current [`SearchState`] lives in a `tokio::sync::watch` channel;
//! subscribers see each published change.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::debounce::Debouncer;
use crate::error::SearchError;
use crate::models::Song;
use crate::search::{EffectiveQuery, SongSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    /// Input changed; waiting for the quiet period to pass.
    Debouncing,
    /// The latest issued request has not completed yet.
    Fetching,
}

/// How one issued request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Result set replaced; carries the number of songs.
    Published(usize),
    /// A newer request was issued before this one completed.
    DiscardedStale,
    /// Request failed; the previous result set was kept.
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub phase: SearchPhase,
    /// Raw text of the most recent `set_query`.
    pub query: String,
    /// Query of the most recently issued request.
    pub effective: Option<EffectiveQuery>,
    /// Generation of the most recently issued request.
    pub generation: u64,
    /// Query whose results are currently in `songs`.
    pub results_for: Option<EffectiveQuery>,
    pub songs: Arc<Vec<Song>>,
    /// True from issue until the latest request completes, even if new
    /// input moved `phase` back to `Debouncing` meanwhile.
    pub in_flight: bool,
    /// Message of the last failure, cleared by the next successful publish.
    pub last_error: Option<String>,
    /// Generation that produced `last_error`.
    pub error_generation: Option<u64>,
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        self.in_flight
    }
}

struct Shared<S> {
    source: S,
    state: watch::Sender<SearchState>,
}

impl<S: SongSource> Shared<S> {
    /// Allocate the next generation and mark it in flight.
    fn begin(&self, query: &EffectiveQuery) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|s| {
            s.generation += 1;
            s.effective = Some(query.clone());
            s.phase = SearchPhase::Fetching;
            s.in_flight = true;
            generation = s.generation;
        });
        generation
    }

    fn finish(
        &self,
        generation: u64,
        query: EffectiveQuery,
        result: Result<Vec<Song>, SearchError>,
    ) -> SearchOutcome {
        let mut outcome = SearchOutcome::DiscardedStale;
        self.state.send_if_modified(|s| {
            if s.generation != generation {
                debug!(
                    "[search] discarding stale gen {} (latest {})",
                    generation, s.generation
                );
                return false;
            }
            s.in_flight = false;
            if s.phase == SearchPhase::Fetching {
                s.phase = SearchPhase::Idle;
            }
            match result {
                Ok(songs) => {
                    info!("[search] gen {} published {} songs", generation, songs.len());
                    outcome = SearchOutcome::Published(songs.len());
                    s.songs = Arc::new(songs);
                    s.results_for = Some(query);
                    s.last_error = None;
                    s.error_generation = None;
                }
                Err(e) => {
                    warn!("[search] gen {} failed: {}", generation, e);
                    outcome = SearchOutcome::Failed;
                    s.last_error = Some(e.to_string());
                    s.error_generation = Some(generation);
                }
            }
            true
        });
        outcome
    }
}

/// Issue one request now. The generation is taken before this returns, so
/// issue order, not completion order, decides which response wins.
fn spawn_search<S>(shared: &Arc<Shared<S>>, query: EffectiveQuery) -> JoinHandle<SearchOutcome>
where
    S: SongSource + 'static,
{
    let generation = shared.begin(&query);
    let shared = Arc::clone(shared);
    tokio::spawn(async move {
        let result = shared.source.search(&query).await;
        shared.finish(generation, query, result)
    })
}

pub struct SearchCoordinator<S> {
    shared: Arc<Shared<S>>,
    quiet_period: Duration,
    timer: Debouncer,
}

impl<S: SongSource + 'static> SearchCoordinator<S> {
    pub fn new(source: S, quiet_period: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            shared: Arc::new(Shared { source, state }),
            quiet_period,
            timer: Debouncer::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.shared.state.subscribe()
    }

    pub fn state(&self) -> SearchState {
        self.shared.state.borrow().clone()
    }

    pub fn query(&self) -> String {
        self.shared.state.borrow().query.clone()
    }

    /// Record new input and (re)arm the quiet-period timer.
    pub fn set_query(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.shared.state.send_modify(|s| {
            s.query = text.clone();
            s.phase = SearchPhase::Debouncing;
        });

        let shared = Arc::clone(&self.shared);
        self.timer.schedule(self.quiet_period, async move {
            let query = EffectiveQuery::resolve(&text);
            debug!("[search] quiet period over, issuing {:?}", query);
            // Detached: re-arming the timer must not cancel a running fetch.
            drop(spawn_search(&shared, query));
        });
    }

    /// Skip the quiet period: cancel any pending timer and issue `text`
    /// immediately.
    pub fn search_now(&mut self, text: impl Into<String>) -> JoinHandle<SearchOutcome> {
        let text = text.into();
        self.timer.cancel();
        self.shared.state.send_modify(|s| s.query = text.clone());
        self.execute_search(EffectiveQuery::resolve(&text))
    }

    /// Perform exactly one request for `query` and publish it if it is still
    /// the latest when it completes.
    pub fn execute_search(&self, query: EffectiveQuery) -> JoinHandle<SearchOutcome> {
        spawn_search(&self.shared, query)
    }

    pub fn is_debouncing(&self) -> bool {
        self.timer.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn song(id: u64) -> Song {
        Song {
            track_id: id,
            track_name: format!("t{}", id),
            artist_name: String::new(),
            artwork_url: String::new(),
            preview_url: None,
            collection_name: None,
        }
    }

    /// Succeeds for every term except "fail".
    #[derive(Default)]
    struct Flaky {
        calls: Mutex<Vec<EffectiveQuery>>,
    }

    #[async_trait]
    impl SongSource for Flaky {
        async fn search(&self, query: &EffectiveQuery) -> Result<Vec<Song>, SearchError> {
            self.calls.lock().unwrap().push(query.clone());
            tokio::time::sleep(Duration::from_millis(20)).await;
            match query {
                EffectiveQuery::Text(t) if t == "fail" => Err(SearchError::Status(503)),
                EffectiveQuery::Text(t) => Ok(vec![song(t.len() as u64)]),
                EffectiveQuery::Popular => Ok((0..10).map(song).collect()),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_phases_through_one_search() {
        let mut c = SearchCoordinator::new(Flaky::default(), Duration::from_millis(500));
        assert_eq!(c.state().phase, SearchPhase::Idle);

        c.set_query("abc");
        assert_eq!(c.state().phase, SearchPhase::Debouncing);
        assert!(c.is_debouncing());

        tokio::time::sleep(Duration::from_millis(505)).await;
        let s = c.state();
        assert_eq!(s.phase, SearchPhase::Fetching);
        assert!(s.is_loading());
        assert_eq!(s.generation, 1);

        tokio::time::sleep(Duration::from_millis(30)).await;
        let s = c.state();
        assert_eq!(s.phase, SearchPhase::Idle);
        assert_eq!(s.songs.len(), 1);
        assert_eq!(s.results_for, Some(EffectiveQuery::Text("abc".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_last_results() {
        let c = SearchCoordinator::new(Flaky::default(), Duration::from_millis(500));
        let first = c.execute_search(EffectiveQuery::Popular).await.unwrap();
        assert_eq!(first, SearchOutcome::Published(10));

        let second = c
            .execute_search(EffectiveQuery::Text("fail".into()))
            .await
            .unwrap();
        assert_eq!(second, SearchOutcome::Failed);

        let s = c.state();
        assert_eq!(s.songs.len(), 10);
        assert_eq!(s.results_for, Some(EffectiveQuery::Popular));
        assert!(!s.is_loading());
        assert!(s.last_error.as_deref().unwrap_or("").contains("503"));

        c.execute_search(EffectiveQuery::Text("ok".into())).await.unwrap();
        assert!(c.state().last_error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_tagged_with_its_generation() {
        let c = SearchCoordinator::new(Flaky::default(), Duration::from_millis(500));
        c.execute_search(EffectiveQuery::Text("fail".into()))
            .await
            .unwrap();
        assert_eq!(c.state().error_generation, Some(1));

        // The next request is in flight: the old failure keeps its tag.
        let next = c.execute_search(EffectiveQuery::Text("fail".into()));
        let s = c.state();
        assert_eq!(s.generation, 2);
        assert_eq!(s.error_generation, Some(1));

        next.await.unwrap();
        assert_eq!(c.state().error_generation, Some(2));

        c.execute_search(EffectiveQuery::Popular).await.unwrap();
        assert_eq!(c.state().error_generation, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_now_cancels_pending_timer() {
        let mut c = SearchCoordinator::new(Flaky::default(), Duration::from_millis(500));
        c.set_query("typed");
        let outcome = c.search_now("").await.unwrap();
        assert_eq!(outcome, SearchOutcome::Published(10));

        tokio::time::sleep(Duration::from_secs(2)).await;
        let calls = c.shared.source.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![EffectiveQuery::Popular]);
        assert_eq!(c.query(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_published_results() {
        let c = SearchCoordinator::new(Flaky::default(), Duration::from_millis(500));
        let mut rx = c.subscribe();
        c.execute_search(EffectiveQuery::Popular).await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().songs.len(), 10);
    }
}
