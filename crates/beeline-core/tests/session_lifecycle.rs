//! End-to-end session clock behavior under a paused tokio clock.
//!
//! No test here waits on wall time: phases elapse via
//! `tokio::time::advance`, and `settle()` drains the spawned chain
//! between steps.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

use async_trait::async_trait;
use uuid::Uuid;

use beeline_core::{
    ClockConfig, CoreError, MemorySessionStore, Session, SessionClock, SessionStatus,
    SessionStore, StoreError, SystemClock,
};

/// Store wrapper that counts how many times each status value was
/// persisted, to pin down double-advance bugs.
#[derive(Clone)]
struct CountingStore {
    inner: MemorySessionStore,
    break_saves: Arc<AtomicUsize>,
    completed_saves: Arc<AtomicUsize>,
}

impl CountingStore {
    fn new(inner: MemorySessionStore) -> Self {
        Self {
            inner,
            break_saves: Arc::new(AtomicUsize::new(0)),
            completed_saves: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl SessionStore for CountingStore {
    async fn get(&self, session_id: Uuid) -> Result<Option<Session>, StoreError> {
        self.inner.get(session_id).await
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        match session.status {
            SessionStatus::Break => {
                self.break_saves.fetch_add(1, Ordering::SeqCst);
            }
            SessionStatus::Completed => {
                self.completed_saves.fetch_add(1, Ordering::SeqCst);
            }
            _ => {}
        }
        self.inner.save(session).await
    }
}

/// Store wrapper whose next armed `get` reads the record, then parks
/// until released, returning the pre-release snapshot. Reproduces the
/// load-then-save window inside a phase advance.
#[derive(Clone)]
struct StaleReadStore {
    inner: MemorySessionStore,
    armed: Arc<AtomicBool>,
    gate: Arc<Notify>,
}

impl StaleReadStore {
    fn new(inner: MemorySessionStore) -> Self {
        Self {
            inner,
            armed: Arc::new(AtomicBool::new(false)),
            gate: Arc::new(Notify::new()),
        }
    }
}

#[async_trait]
impl SessionStore for StaleReadStore {
    async fn get(&self, session_id: Uuid) -> Result<Option<Session>, StoreError> {
        let snapshot = self.inner.get(session_id).await?;
        if self.armed.swap(false, Ordering::SeqCst) {
            self.gate.notified().await;
        }
        Ok(snapshot)
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        self.inner.save(session).await
    }
}

fn session_clock(store: &MemorySessionStore) -> SessionClock {
    SessionClock::new(
        Arc::new(store.clone()),
        Arc::new(SystemClock),
        ClockConfig::default(),
    )
}

async fn seed(store: &MemorySessionStore) -> Uuid {
    let session = Session::new("user-1", Uuid::new_v4(), 5);
    let id = session.session_id;
    store.insert(session).await;
    id
}

async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

async fn status_of(store: &MemorySessionStore, id: Uuid) -> SessionStatus {
    store.get(id).await.unwrap().unwrap().status
}

#[tokio::test(start_paused = true)]
async fn natural_expiry_walks_work_break_completed() {
    let store = MemorySessionStore::new();
    let clock = session_clock(&store);
    let id = seed(&store).await;

    clock.start(id).await.unwrap();
    settle().await;
    assert_eq!(status_of(&store, id).await, SessionStatus::InProgress);

    // Just short of the work interval: still working.
    tokio::time::advance(Duration::from_secs(25 * 60 - 1)).await;
    settle().await;
    assert_eq!(status_of(&store, id).await, SessionStatus::InProgress);

    // Work interval elapses: break begins, end_time still unset.
    tokio::time::advance(Duration::from_secs(1)).await;
    settle().await;
    let session = store.get(id).await.unwrap().unwrap();
    assert_eq!(session.status, SessionStatus::Break);
    assert!(session.end_time.is_none());

    // Break interval elapses: session completes, end_time set.
    tokio::time::advance(Duration::from_secs(5 * 60)).await;
    settle().await;
    let session = store.get(id).await.unwrap().unwrap();
    assert_eq!(session.status, SessionStatus::Completed);
    assert!(session.end_time.is_some());
    assert!(!clock.is_running(id));
}

#[tokio::test(start_paused = true)]
async fn stop_during_work_is_terminal() {
    let store = MemorySessionStore::new();
    let clock = session_clock(&store);
    let id = seed(&store).await;

    clock.start(id).await.unwrap();
    settle().await;
    tokio::time::advance(Duration::from_secs(10 * 60)).await;
    settle().await;
    clock.stop(id).await.unwrap();
    settle().await;

    let session = store.get(id).await.unwrap().unwrap();
    assert_eq!(session.status, SessionStatus::Stopped);
    assert!(session.end_time.is_some());

    // Long past every phase deadline: no further transitions.
    tokio::time::advance(Duration::from_secs(2 * 60 * 60)).await;
    settle().await;
    assert_eq!(status_of(&store, id).await, SessionStatus::Stopped);
}

#[tokio::test(start_paused = true)]
async fn stop_during_break_is_terminal() {
    let store = MemorySessionStore::new();
    let clock = session_clock(&store);
    let id = seed(&store).await;

    clock.start(id).await.unwrap();
    settle().await;
    tokio::time::advance(Duration::from_secs(25 * 60)).await;
    settle().await;
    assert_eq!(status_of(&store, id).await, SessionStatus::Break);

    clock.stop(id).await.unwrap();
    settle().await;
    assert_eq!(status_of(&store, id).await, SessionStatus::Stopped);

    tokio::time::advance(Duration::from_secs(60 * 60)).await;
    settle().await;
    assert_eq!(status_of(&store, id).await, SessionStatus::Stopped);
}

#[tokio::test(start_paused = true)]
async fn resume_at_break_restarts_the_full_break_interval() {
    let store = MemorySessionStore::new();
    let clock = session_clock(&store);
    let id = seed(&store).await;

    clock.start(id).await.unwrap();
    settle().await;
    tokio::time::advance(Duration::from_secs(25 * 60)).await;
    settle().await;
    assert_eq!(status_of(&store, id).await, SessionStatus::Break);

    // Two minutes into the break, pause. Status stays Break.
    tokio::time::advance(Duration::from_secs(2 * 60)).await;
    settle().await;
    clock.pause(id).await.unwrap();
    settle().await;
    assert_eq!(status_of(&store, id).await, SessionStatus::Break);

    // Paused sessions never advance, however long they sit.
    tokio::time::advance(Duration::from_secs(30 * 60)).await;
    settle().await;
    assert_eq!(status_of(&store, id).await, SessionStatus::Break);

    // Resume restarts the break at its full five minutes, not the
    // three that were left.
    clock.resume(id).await.unwrap();
    settle().await;
    tokio::time::advance(Duration::from_secs(5 * 60 - 1)).await;
    settle().await;
    assert_eq!(status_of(&store, id).await, SessionStatus::Break);

    tokio::time::advance(Duration::from_secs(1)).await;
    settle().await;
    assert_eq!(status_of(&store, id).await, SessionStatus::Completed);
}

#[tokio::test(start_paused = true)]
async fn pausing_one_session_leaves_others_running() {
    let store = MemorySessionStore::new();
    let clock = session_clock(&store);
    let first = seed(&store).await;
    let second = seed(&store).await;

    clock.start(first).await.unwrap();
    clock.start(second).await.unwrap();
    clock.pause(first).await.unwrap();
    settle().await;

    assert!(!clock.is_running(first));
    assert!(clock.is_running(second));

    tokio::time::advance(Duration::from_secs(25 * 60)).await;
    settle().await;
    assert_eq!(status_of(&store, first).await, SessionStatus::InProgress);
    assert_eq!(status_of(&store, second).await, SessionStatus::Break);
}

#[tokio::test(start_paused = true)]
async fn repeated_resume_never_double_advances() {
    let inner = MemorySessionStore::new();
    let counting = CountingStore::new(inner.clone());
    let clock = SessionClock::new(
        Arc::new(counting.clone()),
        Arc::new(SystemClock),
        ClockConfig::default(),
    );
    let id = seed(&inner).await;

    clock.start(id).await.unwrap();
    clock.pause(id).await.unwrap();
    settle().await;

    // Back-to-back resumes: the second retires the first timer.
    clock.resume(id).await.unwrap();
    clock.resume(id).await.unwrap();
    settle().await;

    tokio::time::advance(Duration::from_secs(25 * 60)).await;
    settle().await;
    tokio::time::advance(Duration::from_secs(5 * 60)).await;
    settle().await;

    assert_eq!(status_of(&inner, id).await, SessionStatus::Completed);
    assert_eq!(counting.break_saves.load(Ordering::SeqCst), 1);
    assert_eq!(counting.completed_saves.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn concurrent_pause_and_resume_leave_at_most_one_timer() {
    let inner = MemorySessionStore::new();
    let counting = CountingStore::new(inner.clone());
    let clock = SessionClock::new(
        Arc::new(counting.clone()),
        Arc::new(SystemClock),
        ClockConfig::default(),
    );
    let id = seed(&inner).await;

    clock.start(id).await.unwrap();
    let (pause, resume) = tokio::join!(clock.pause(id), clock.resume(id));
    pause.unwrap();
    resume.unwrap();
    settle().await;

    tokio::time::advance(Duration::from_secs(31 * 60)).await;
    settle().await;

    // Whichever call won the race, the work phase advanced at most
    // once and never twice.
    assert!(counting.break_saves.load(Ordering::SeqCst) <= 1);
    assert!(counting.completed_saves.load(Ordering::SeqCst) <= 1);
}

#[tokio::test(start_paused = true)]
async fn late_phase_save_never_overwrites_stop() {
    let inner = MemorySessionStore::new();
    let store = StaleReadStore::new(inner.clone());
    let clock = SessionClock::new(
        Arc::new(store.clone()),
        Arc::new(SystemClock),
        ClockConfig::default(),
    );
    let id = seed(&inner).await;

    clock.start(id).await.unwrap();
    settle().await;

    // Arm the stale read, then let the work phase expire: the chain
    // loads InProgress and parks mid-advance, before its save.
    store.armed.store(true, Ordering::SeqCst);
    tokio::time::advance(Duration::from_secs(25 * 60)).await;
    settle().await;

    // Stop lands its terminal write and cancels the timer while the
    // chain still holds the pre-stop snapshot.
    clock.stop(id).await.unwrap();
    store.gate.notify_one();
    settle().await;

    let session = inner.get(id).await.unwrap().unwrap();
    assert_eq!(session.status, SessionStatus::Stopped);
    assert!(session.end_time.is_some());
}

#[tokio::test]
async fn every_operation_reports_not_found_for_unknown_ids() {
    let store = MemorySessionStore::new();
    let clock = session_clock(&store);
    let missing = Uuid::new_v4();

    for result in [
        clock.start(missing).await,
        clock.pause(missing).await,
        clock.resume(missing).await,
        clock.stop(missing).await,
    ] {
        assert!(matches!(
            result,
            Err(CoreError::SessionNotFound(id)) if id == missing
        ));
    }
}
