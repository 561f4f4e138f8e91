//! Reward computation commands.

use std::sync::Arc;

use chrono::Utc;
use clap::Subcommand;
use uuid::Uuid;

use beeline_core::{
    badge_for, points_for, MemoryRewardStore, RewardEngine, SystemClock, Task, TaskPriority,
    TaskStatus,
};

#[derive(Subcommand)]
pub enum RewardAction {
    /// Points for a priority label
    Points {
        #[arg(long)]
        priority: String,
    },
    /// Badge tier for a points value
    Badge {
        #[arg(long)]
        points: u32,
    },
    /// Mint a demo reward for a completed task
    Mint {
        #[arg(long)]
        priority: String,
        #[arg(long, default_value = "demo-user")]
        user: String,
    },
}

pub async fn run(action: RewardAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RewardAction::Points { priority } => {
            let points = points_for(TaskPriority::parse(&priority));
            println!(
                "{}",
                serde_json::json!({ "priority": priority, "points": points })
            );
        }
        RewardAction::Badge { points } => {
            println!(
                "{}",
                serde_json::json!({ "points": points, "badge": badge_for(points).to_string() })
            );
        }
        RewardAction::Mint { priority, user } => {
            let Some(parsed) = TaskPriority::parse(&priority) else {
                return Err(format!("unknown priority '{priority}'").into());
            };
            let store = MemoryRewardStore::new();
            let engine = RewardEngine::new(Arc::new(store.clone()), Arc::new(SystemClock));
            let task = Task {
                task_id: Uuid::new_v4(),
                user_id: user,
                name: "demo task".into(),
                description: String::new(),
                priority: parsed,
                status: TaskStatus::Completed,
                created_at: Utc::now(),
                deadline: None,
                completed_at: Some(Utc::now()),
            };
            let reward = engine.on_task_completed(&task).await?;
            println!("{}", serde_json::to_string_pretty(&reward)?);
        }
    }
    Ok(())
}
