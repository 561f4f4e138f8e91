//! Session clock configuration.
//!
//! Phase lengths are configuration, not literals: 25-minute work and
//! 5-minute break intervals by default.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How `resume` treats a phase whose timer was previously cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeBehavior {
    /// Restart the interrupted phase at its full duration.
    #[default]
    FullPhase,
    /// Derive the leftover time from the session's persisted start
    /// timestamp. Best effort: pausing persists no progress, so the
    /// remainder is measured against the original wall-clock deadline.
    Remaining,
}

/// Phase durations and resume policy for the session clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Work-interval length in minutes.
    #[serde(default = "default_work_min")]
    pub work_min: u64,
    /// Break-interval length in minutes.
    #[serde(default = "default_break_min")]
    pub break_min: u64,
    #[serde(default)]
    pub resume: ResumeBehavior,
}

fn default_work_min() -> u64 {
    25
}

fn default_break_min() -> u64 {
    5
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            work_min: default_work_min(),
            break_min: default_break_min(),
            resume: ResumeBehavior::default(),
        }
    }
}

impl ClockConfig {
    pub fn work_duration(&self) -> Duration {
        Duration::from_secs(self.work_min.saturating_mul(60))
    }

    pub fn break_duration(&self) -> Duration {
        Duration::from_secs(self.break_min.saturating_mul(60))
    }
}
