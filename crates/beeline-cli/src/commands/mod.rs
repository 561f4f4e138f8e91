pub mod reward;
pub mod session;
