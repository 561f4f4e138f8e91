//! Persistence collaborator contracts.
//!
//! The relational store lives outside this crate; the clock and reward
//! engine reach it through these traits. [`MemorySessionStore`] and
//! [`MemoryRewardStore`] are the in-process implementations used by
//! tests and the demo CLI.

mod memory;

pub use memory::{MemoryRewardStore, MemorySessionStore};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{Reward, Session};

/// Session persistence seam. The clock goes through this for every
/// read/mutate step of phase advancement.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Look up a session; `Ok(None)` when the id is unknown.
    async fn get(&self, session_id: Uuid) -> Result<Option<Session>, StoreError>;

    /// Persist the session record, replacing any previous version.
    async fn save(&self, session: &Session) -> Result<(), StoreError>;
}

/// Append-only reward persistence seam.
#[async_trait]
pub trait RewardStore: Send + Sync {
    async fn append(&self, reward: &Reward) -> Result<(), StoreError>;
}
