//! In-memory store implementations.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RewardStore, SessionStore};
use crate::error::StoreError;
use crate::model::{Reward, Session};

/// Hash-map session store guarded by an async RwLock. Cloning shares
/// the underlying map.
#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a session record. Session creation is the API layer's job;
    /// this stands in for it.
    pub async fn insert(&self, session: Session) {
        self.sessions
            .write()
            .await
            .insert(session.session_id, session);
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: Uuid) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.read().await.get(&session_id).cloned())
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        self.sessions
            .write()
            .await
            .insert(session.session_id, session.clone());
        Ok(())
    }
}

/// Append-only reward log.
#[derive(Debug, Default, Clone)]
pub struct MemoryRewardStore {
    rewards: Arc<RwLock<Vec<Reward>>>,
}

impl MemoryRewardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All rewards appended so far, in order.
    pub async fn all(&self) -> Vec<Reward> {
        self.rewards.read().await.clone()
    }
}

#[async_trait]
impl RewardStore for MemoryRewardStore {
    async fn append(&self, reward: &Reward) -> Result<(), StoreError> {
        self.rewards.write().await.push(reward.clone());
        Ok(())
    }
}
