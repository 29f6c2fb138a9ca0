//! Error types for the conversational core.

use crate::state::SessionState;
use crate::types::MessageId;

/// Errors from chat sessions.
///
/// Empty submissions are not errors; they are ignored without a state change.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("a reply is still pending for this session")]
    ReplyPending,
    #[error("invalid session transition: {from} -> {to}")]
    InvalidTransition {
        from: SessionState,
        to: SessionState,
    },
    #[error("reply ticket for message {0} does not match the pending submission")]
    StaleReply(MessageId),
    #[error("session not found: {0}")]
    SessionNotFound(uuid::Uuid),
    #[error("session limit of {0} reached")]
    SessionLimit(usize),
    #[error("session lock poisoned: {0}")]
    LockPoisoned(String),
    #[error("reply task failed: {0}")]
    ReplyTask(String),
}
