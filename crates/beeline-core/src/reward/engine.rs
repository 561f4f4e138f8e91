//! Reward minting for completed tasks.
//!
//! The task-update path calls [`completion_edge`] on every status
//! change and routes the task here exactly when the edge fires, so a
//! completion produces at most one reward. The computation itself is
//! deterministic; the only side effect is a single store append.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::model::{BadgeTier, Reward, Task, TaskPriority, TaskStatus};
use crate::store::RewardStore;
use crate::time::Clock;

/// True iff a status change crosses into Completed.
///
/// Saving an already-completed task does not cross the edge. Creating
/// a task directly in Completed status has no previous value and never
/// reaches this predicate.
pub fn completion_edge(previous: TaskStatus, next: TaskStatus) -> bool {
    previous != TaskStatus::Completed && next == TaskStatus::Completed
}

/// Priority to points. Total: an unmapped priority scores zero.
pub fn points_for(priority: Option<TaskPriority>) -> u32 {
    match priority {
        Some(TaskPriority::Low) => 10,
        Some(TaskPriority::Medium) => 20,
        Some(TaskPriority::High) => 30,
        None => 0,
    }
}

/// Points to badge tier, thresholds checked high to low so 100 maps to
/// Gold rather than falling through to a lower tier.
pub fn badge_for(points: u32) -> BadgeTier {
    if points >= 100 {
        BadgeTier::Gold
    } else if points >= 50 {
        BadgeTier::Silver
    } else if points >= 20 {
        BadgeTier::Bronze
    } else {
        BadgeTier::Participant
    }
}

/// Mints one reward per task-completion edge.
pub struct RewardEngine {
    store: Arc<dyn RewardStore>,
    clock: Arc<dyn Clock>,
}

impl RewardEngine {
    pub fn new(store: Arc<dyn RewardStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Build and append the reward for a task that just crossed the
    /// completion edge. Badge is derived from this award's points
    /// alone, not a running user total.
    pub async fn on_task_completed(&self, task: &Task) -> Result<Reward> {
        let points = points_for(Some(task.priority));
        let reward = Reward {
            reward_id: Uuid::new_v4(),
            user_id: task.user_id.clone(),
            points,
            badge: badge_for(points),
            date_earned: self.clock.now(),
        };
        self.store.append(&reward).await?;
        info!(
            task_id = %task.task_id,
            user_id = %reward.user_id,
            points,
            badge = %reward.badge,
            "reward minted"
        );
        Ok(reward)
    }
}
