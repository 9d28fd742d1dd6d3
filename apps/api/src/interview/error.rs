use thiserror::Error;
use uuid::Uuid;

use crate::interview::models::SessionStatus;

/// Caller-facing engine failures. None of these mutate session state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterviewError {
    #[error("Interview session {0} not found")]
    NotFound(Uuid),

    #[error("Interview session {session_id} is {status:?}")]
    InvalidState {
        session_id: Uuid,
        status: SessionStatus,
    },

    #[error("Stale question index: expected {expected}, got {received}")]
    StaleQuestion { expected: usize, received: usize },

    #[error("Invalid interview input: {0}")]
    Validation(String),
}
