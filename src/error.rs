//! Error types
//!
//! Configuration mistakes surface as [`RaceError`] when a session or command
//! is created. Storage problems surface as [`StorageError`] from backends and
//! are recovered by the progress store.

use thiserror::Error;

use crate::game::StageAccess;
use crate::sim::RacePhase;

/// Errors raised when starting or commanding a race
#[derive(Debug, Error, PartialEq)]
pub enum RaceError {
    #[error("unknown stage id {0}")]
    UnknownStage(u32),

    #[error("unknown route choice {0:?}")]
    UnknownRoute(String),

    #[error("cannot {action} while in {phase:?} phase")]
    UnexpectedPhase {
        action: &'static str,
        phase: RacePhase,
    },

    #[error("stage {id} is not available: {access:?}")]
    StageUnavailable { id: u32, access: StageAccess },

    #[error("no race in progress")]
    NoActiveRace,
}

/// Errors raised by progress storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store could not be reached (no window, storage disabled)
    #[error("storage unavailable")]
    Unavailable,

    #[error("failed to encode progress: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode progress: {0}")]
    Decode(#[source] serde_json::Error),

    /// The backend rejected the operation (quota exceeded, security error)
    #[error("storage backend error: {0}")]
    Backend(String),
}
