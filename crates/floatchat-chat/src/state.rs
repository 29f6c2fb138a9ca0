//! Submission state of a chat session.
//!
//! - Idle -> AwaitingResponse (user message accepted)
//! - AwaitingResponse -> Idle (assistant reply appended)
//!
//! There is no cancel edge: an accepted submission always completes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a session can take a new submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Ready for the next user message.
    #[default]
    Idle,
    /// A user message was appended and its reply is not in yet.
    AwaitingResponse,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::AwaitingResponse => write!(f, "AwaitingResponse"),
        }
    }
}

impl SessionState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &SessionState) -> bool {
        matches!(
            (self, target),
            (SessionState::Idle, SessionState::AwaitingResponse)
                | (SessionState::AwaitingResponse, SessionState::Idle)
        )
    }
}
