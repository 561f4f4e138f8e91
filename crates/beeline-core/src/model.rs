//! Entity records shared by the session clock and the reward engine.
//!
//! Sessions and rewards are owned by this core; tasks are read-only
//! references into the task service. Statuses are closed enums so an
//! invalid phase is unrepresentable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Phase of a focus session. Single source of truth for where the
/// session sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    InProgress,
    Break,
    Completed,
    Stopped,
}

impl SessionStatus {
    /// Completed and Stopped are terminal; no timer ever runs again.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Stopped)
    }
}

/// One focus-session attempt against a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: Uuid,
    pub user_id: String,
    pub task_id: Uuid,
    /// Set by the clock when the session starts.
    pub start_time: Option<DateTime<Utc>>,
    /// Set exactly once, on entry to Completed or Stopped.
    pub end_time: Option<DateTime<Utc>>,
    /// Break length recorded at creation time, in minutes.
    pub break_duration_min: u32,
    pub status: SessionStatus,
}

impl Session {
    /// A freshly created session awaiting `start`.
    pub fn new(user_id: impl Into<String>, task_id: Uuid, break_duration_min: u32) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            user_id: user_id.into(),
            task_id,
            start_time: None,
            end_time: None,
            break_duration_min,
            status: SessionStatus::Pending,
        }
    }
}

/// Task priority as assigned by the task service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    /// Parse a priority label. Unknown labels return `None` and score
    /// zero points downstream.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Task lifecycle status. The reward engine only cares about the
/// transition into `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

/// Read-only view of a task record. Owned by the task service; the
/// core never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub task_id: Uuid,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Badge tier awarded with a reward, derived from its points by
/// ordered threshold comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BadgeTier {
    Participant,
    Bronze,
    Silver,
    Gold,
}

impl BadgeTier {
    pub fn as_str(self) -> &'static str {
        match self {
            BadgeTier::Participant => "Participant",
            BadgeTier::Bronze => "Bronze",
            BadgeTier::Silver => "Silver",
            BadgeTier::Gold => "Gold",
        }
    }
}

impl fmt::Display for BadgeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reward record, minted per completed task. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reward {
    pub reward_id: Uuid,
    pub user_id: String,
    pub points: u32,
    pub badge: BadgeTier,
    pub date_earned: DateTime<Utc>,
}
