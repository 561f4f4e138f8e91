//! Live session driver against the in-memory store.
//!
//! Stands in for the API layer: seeds a session, starts the clock, and
//! polls the store once a second, printing each persisted transition
//! until the session reaches a terminal status.

use std::sync::Arc;
use std::time::Duration;

use clap::Subcommand;
use uuid::Uuid;

use beeline_core::{
    ClockConfig, MemorySessionStore, Session, SessionClock, SessionStatus, SessionStore,
    SystemClock,
};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Run a demo session end-to-end with shortened phases
    Run {
        /// Work interval in minutes
        #[arg(long, default_value = "1")]
        work_min: u32,
        /// Break interval in minutes
        #[arg(long, default_value = "1")]
        break_min: u32,
        /// Pause this many seconds in, then resume ten seconds later
        #[arg(long)]
        pause_after: Option<u64>,
        /// Stop the session early after this many seconds
        #[arg(long)]
        stop_after: Option<u64>,
    },
}

pub async fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SessionAction::Run {
            work_min,
            break_min,
            pause_after,
            stop_after,
        } => run_demo(work_min, break_min, pause_after, stop_after).await,
    }
}

async fn run_demo(
    work_min: u32,
    break_min: u32,
    pause_after: Option<u64>,
    stop_after: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = MemorySessionStore::new();
    let session = Session::new("demo-user", Uuid::new_v4(), break_min);
    let session_id = session.session_id;
    store.insert(session).await;

    let config = ClockConfig {
        work_min: u64::from(work_min),
        break_min: u64::from(break_min),
        ..ClockConfig::default()
    };
    let clock = SessionClock::new(Arc::new(store.clone()), Arc::new(SystemClock), config);
    clock.start(session_id).await?;

    let started = tokio::time::Instant::now();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    let mut last = SessionStatus::Pending;
    let mut paused = false;
    let mut stopped = false;

    loop {
        ticker.tick().await;
        let elapsed = started.elapsed().as_secs();

        if let Some(at) = pause_after {
            if !paused && elapsed >= at {
                paused = true;
                clock.pause(session_id).await?;
                eprintln!("paused; resuming in 10s");
                tokio::time::sleep(Duration::from_secs(10)).await;
                clock.resume(session_id).await?;
                eprintln!("resumed");
            }
        }
        if let Some(at) = stop_after {
            if !stopped && elapsed >= at {
                stopped = true;
                clock.stop(session_id).await?;
            }
        }

        let session = store
            .get(session_id)
            .await?
            .ok_or("session missing from store")?;
        if session.status != last {
            last = session.status;
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        if session.status.is_terminal() {
            break;
        }
    }
    Ok(())
}
