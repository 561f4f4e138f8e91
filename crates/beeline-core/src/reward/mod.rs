mod engine;

pub use engine::{badge_for, completion_edge, points_for, RewardEngine};
