//! # Beeline Core Library
//!
//! Core business logic for Beeline, a personal productivity backend:
//! the focus-session clock and the reward engine. HTTP routing,
//! authentication, and relational persistence live elsewhere and reach
//! this crate only through the [`store`] traits and the [`time::Clock`]
//! seam.
//!
//! ## Key Components
//!
//! - [`SessionClock`]: per-session phase timer state machine
//!   (Pending → InProgress → Break → Completed, with pause/resume/stop)
//! - [`RewardEngine`]: deterministic points/badge computation fired on
//!   the task-completion edge
//! - [`SessionStore`] / [`RewardStore`]: persistence seams, with
//!   in-memory implementations for tests and demos
//! - [`ClockConfig`]: phase durations and resume policy

pub mod clock;
pub mod error;
pub mod model;
pub mod reward;
pub mod store;
pub mod time;

pub use clock::{ClockConfig, ResumeBehavior, SessionClock};
pub use error::{CoreError, Result, StoreError};
pub use model::{BadgeTier, Reward, Session, SessionStatus, Task, TaskPriority, TaskStatus};
pub use reward::{badge_for, completion_edge, points_for, RewardEngine};
pub use store::{MemoryRewardStore, MemorySessionStore, RewardStore, SessionStore};
pub use time::{Clock, FixedClock, SystemClock};
