mod config;
mod session_clock;

pub use config::{ClockConfig, ResumeBehavior};
pub use session_clock::SessionClock;
