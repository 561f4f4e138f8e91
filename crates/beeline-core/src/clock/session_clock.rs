//! Focus-session clock.
//!
//! Drives one session per session id through its timed phases:
//!
//! ```text
//! Pending --start()--> InProgress --(work elapses)--> Break --(break elapses)--> Completed
//! InProgress | Break --stop()--> Stopped
//! ```
//!
//! `start` and `resume` return as soon as the initial write lands;
//! phase advancement runs on a spawned background task that sleeps for
//! the phase duration and persists the next status on natural expiry.
//! `pause` cancels the running timer without touching persisted state,
//! and `resume` re-enters the persisted phase with a fresh timer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::config::{ClockConfig, ResumeBehavior};
use crate::error::{CoreError, Result};
use crate::model::{Session, SessionStatus};
use crate::store::SessionStore;
use crate::time::Clock;

/// Phase a timer chain starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Work,
    Break,
}

/// Live timer bookkeeping for one session.
struct TimerSlot {
    generation: u64,
    token: CancellationToken,
}

#[derive(Default)]
struct TimerTable {
    next_generation: u64,
    slots: HashMap<Uuid, TimerSlot>,
}

/// Per-session phase-timer owner.
///
/// At most one phase timer is live per session id: installing a new
/// timer retires the previous token first, and the table's lock is the
/// serialization point for racing pause/resume calls. A finished chain
/// removes only its own-generation slot, so a fresh timer installed
/// concurrently is never evicted by a stale task.
pub struct SessionClock {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    config: ClockConfig,
    timers: Arc<Mutex<TimerTable>>,
}

impl SessionClock {
    pub fn new(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>, config: ClockConfig) -> Self {
        Self {
            store,
            clock,
            config,
            timers: Arc::new(Mutex::new(TimerTable::default())),
        }
    }

    /// Start the session: stamp `start_time`, persist InProgress, and
    /// kick off the work-phase timer. Returns once the write lands;
    /// the Break/Completed transitions happen in the background.
    /// Terminal sessions are left untouched.
    pub async fn start(&self, session_id: Uuid) -> Result<()> {
        let mut session = self.load(session_id).await?;
        if session.status.is_terminal() {
            debug!(%session_id, status = ?session.status, "start ignored for terminal session");
            return Ok(());
        }
        session.start_time = Some(self.clock.now());
        session.status = SessionStatus::InProgress;
        self.store.save(&session).await?;
        info!(%session_id, "session started");
        self.spawn_chain(session_id, Phase::Work, self.config.work_duration());
        Ok(())
    }

    /// Cancel the session's running phase timer, if any. Persisted
    /// status is left as-is; pausing an idle session is a no-op.
    pub async fn pause(&self, session_id: Uuid) -> Result<()> {
        self.load(session_id).await?;
        if let Some(slot) = self.table().slots.remove(&session_id) {
            slot.token.cancel();
            debug!(%session_id, "phase timer paused");
        }
        Ok(())
    }

    /// Re-enter the persisted phase with a fresh timer. InProgress
    /// restarts the work interval, Break restarts the break interval;
    /// any other status is a no-op.
    pub async fn resume(&self, session_id: Uuid) -> Result<()> {
        let session = self.load(session_id).await?;
        match session.status {
            SessionStatus::InProgress => {
                let duration = self.phase_duration(&session, Phase::Work);
                self.spawn_chain(session_id, Phase::Work, duration);
                info!(%session_id, "session resumed in work phase");
            }
            SessionStatus::Break => {
                let duration = self.phase_duration(&session, Phase::Break);
                self.spawn_chain(session_id, Phase::Break, duration);
                info!(%session_id, "session resumed in break phase");
            }
            status => {
                debug!(%session_id, ?status, "resume is a no-op in this status");
            }
        }
        Ok(())
    }

    /// Terminate the session: persist Stopped with `end_time`, then
    /// cancel the timer. Cancellation alone never writes state.
    /// Already-terminal sessions are left untouched; their `end_time`
    /// is set exactly once.
    pub async fn stop(&self, session_id: Uuid) -> Result<()> {
        let mut session = self.load(session_id).await?;
        if session.status.is_terminal() {
            debug!(%session_id, status = ?session.status, "stop ignored for terminal session");
            return Ok(());
        }
        session.end_time = Some(self.clock.now());
        session.status = SessionStatus::Stopped;
        self.store.save(&session).await?;
        if let Some(slot) = self.table().slots.remove(&session_id) {
            slot.token.cancel();
        }
        info!(%session_id, "session stopped");
        Ok(())
    }

    /// Whether a phase timer is currently installed for the session.
    pub fn is_running(&self, session_id: Uuid) -> bool {
        self.table().slots.contains_key(&session_id)
    }

    async fn load(&self, session_id: Uuid) -> Result<Session> {
        self.store
            .get(session_id)
            .await?
            .ok_or(CoreError::SessionNotFound(session_id))
    }

    fn table(&self) -> MutexGuard<'_, TimerTable> {
        self.timers.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Duration `resume` re-enters a phase with.
    fn phase_duration(&self, session: &Session, phase: Phase) -> Duration {
        let full = match phase {
            Phase::Work => self.config.work_duration(),
            Phase::Break => self.config.break_duration(),
        };
        match self.config.resume {
            ResumeBehavior::FullPhase => full,
            ResumeBehavior::Remaining => {
                let Some(started) = session.start_time else {
                    return full;
                };
                // Deadline measured from the original start; a break
                // phase ends one work interval plus one break interval
                // after that.
                let elapsed_budget = match phase {
                    Phase::Work => self.config.work_duration(),
                    Phase::Break => self.config.work_duration() + self.config.break_duration(),
                };
                let deadline = started
                    + chrono::Duration::from_std(elapsed_budget).unwrap_or(chrono::TimeDelta::MAX);
                deadline
                    .signed_duration_since(self.clock.now())
                    .to_std()
                    .unwrap_or(Duration::ZERO)
            }
        }
    }

    /// Install a fresh cancellation token (retiring any previous one)
    /// and spawn the phase chain.
    fn spawn_chain(&self, session_id: Uuid, phase: Phase, initial: Duration) {
        let (generation, token) = {
            let mut table = self.table();
            table.next_generation += 1;
            let generation = table.next_generation;
            let token = CancellationToken::new();
            if let Some(previous) = table.slots.insert(
                session_id,
                TimerSlot {
                    generation,
                    token: token.clone(),
                },
            ) {
                previous.token.cancel();
            }
            (generation, token)
        };

        let store = Arc::clone(&self.store);
        let clock = Arc::clone(&self.clock);
        let timers = Arc::clone(&self.timers);
        let break_duration = self.config.break_duration();

        tokio::spawn(async move {
            run_chain(store, clock, session_id, phase, initial, break_duration, token).await;
            let mut table = timers.lock().unwrap_or_else(|e| e.into_inner());
            if table
                .slots
                .get(&session_id)
                .is_some_and(|slot| slot.generation == generation)
            {
                table.slots.remove(&session_id);
            }
        });
    }
}

/// Background phase chain: sleep out the current phase, persist the
/// next status, repeat until Completed. Cancellation ends the chain
/// silently; it is expected control flow, not an error.
async fn run_chain(
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    session_id: Uuid,
    first: Phase,
    initial: Duration,
    break_duration: Duration,
    token: CancellationToken,
) {
    let mut phase = first;
    let mut duration = initial;
    loop {
        tokio::select! {
            _ = token.cancelled() => {
                debug!(%session_id, "phase timer cancelled");
                return;
            }
            _ = tokio::time::sleep(duration) => {}
        }
        match phase {
            Phase::Work => {
                if !advance(
                    store.as_ref(),
                    clock.as_ref(),
                    session_id,
                    SessionStatus::Break,
                    &token,
                )
                .await
                {
                    return;
                }
                phase = Phase::Break;
                duration = break_duration;
            }
            Phase::Break => {
                advance(
                    store.as_ref(),
                    clock.as_ref(),
                    session_id,
                    SessionStatus::Completed,
                    &token,
                )
                .await;
                return;
            }
        }
    }
}

/// Persist a natural phase transition. Returns false when the chain
/// should not continue: session gone, already terminal, or the store
/// failed. Failures here cannot reach the original caller (it returned
/// long ago), so they are logged and the chain halts.
async fn advance(
    store: &dyn SessionStore,
    clock: &dyn Clock,
    session_id: Uuid,
    next: SessionStatus,
    token: &CancellationToken,
) -> bool {
    let mut session = match store.get(session_id).await {
        Ok(Some(session)) => session,
        Ok(None) => {
            warn!(%session_id, "session vanished mid-phase");
            return false;
        }
        Err(err) => {
            warn!(%session_id, %err, "store read failed during phase advance");
            return false;
        }
    };
    if session.status.is_terminal() {
        // A concurrent stop won; its terminal write stands.
        return false;
    }
    session.status = next;
    if next == SessionStatus::Completed {
        session.end_time = Some(clock.now());
    }
    // The read above may have raced a stop: its terminal write lands
    // after our load but before our save. The token is cancelled by
    // then, so re-check it last thing before writing.
    if token.is_cancelled() {
        debug!(%session_id, "phase timer cancelled before save");
        return false;
    }
    if let Err(err) = store.save(&session).await {
        warn!(%session_id, %err, "store write failed during phase advance");
        return false;
    }
    info!(%session_id, status = ?next, "session advanced");
    true
}
