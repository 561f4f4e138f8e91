//! Error taxonomy for the core.
//!
//! Cancellation is deliberately absent: cancelling a phase timer is the
//! mechanism behind pause/stop, not a failure, and must never surface
//! through these types.

use thiserror::Error;
use uuid::Uuid;

/// Failure reported by a persistence collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Errors surfaced by session-clock and reward operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The session id did not resolve to a persisted session.
    /// Catchable by the caller; maps to a not-found response upstream.
    #[error("session '{0}' not found")]
    SessionNotFound(Uuid),

    /// A store read or write failed. The core does not retry; retry
    /// policy belongs to the collaborator or caller.
    #[error("persistence failure: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T, E = CoreError> = std::result::Result<T, E>;
