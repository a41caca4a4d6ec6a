//! Store error types.

use std::path::PathBuf;

use newsdesk_core::ids::{ItemId, ParticipantId};

/// Errors raised when validating a store operation.
///
/// Both variants are the "invalid reference" class: an id the caller
/// supplied does not resolve. They are recovered locally and surfaced to
/// the participant as a specific rejection.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No participant with this id.
    #[error("invalid reference: no participant with id {0}")]
    UnknownParticipant(ParticipantId),
    /// No item with this id.
    #[error("invalid reference: no item with id {0}")]
    UnknownItem(ItemId),
}

/// A failed write-through to durable storage.
///
/// By the time this is produced the in-memory mutation has already been
/// applied and is **not** rolled back — this is a consistency warning
/// (the change may not survive a restart), not a failed operation.
#[derive(Debug, thiserror::Error)]
#[error("failed to persist state to {path:?}: {reason}")]
pub struct PersistenceError {
    /// State file path.
    pub path: PathBuf,
    /// Underlying failure description.
    pub reason: String,
}
