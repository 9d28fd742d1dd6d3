//! In-memory session store with two locks per session.
//!
//! The map lock is only held long enough to insert or look up a handle, so a
//! slow turn on one session never blocks another. Within a session, the turn
//! lock serializes mutations for the whole pipeline, while the state lock is
//! only taken for snapshots and the final commit, so reads never wait on
//! collaborator I/O.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, OwnedMutexGuard, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::interview::error::InterviewError;
use crate::interview::models::{Question, SessionState, Skill};

#[derive(Clone)]
struct SessionHandle {
    turn: Arc<Mutex<()>>,
    state: Arc<Mutex<SessionState>>,
}

/// Exclusive right to mutate one session. Dropping it lets the next turn in.
pub struct SessionTurn {
    _turn: OwnedMutexGuard<()>,
    state: Arc<Mutex<SessionState>>,
}

impl SessionTurn {
    /// Short-held access to the session state. Do not hold across collaborator calls.
    pub async fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().await
    }
}

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an ACTIVE session and returns its id.
    pub async fn create(&self, skills: Vec<Skill>, questions: Vec<Question>) -> Uuid {
        let mut sessions = self.sessions.write().await;
        let mut session_id = Uuid::new_v4();
        while sessions.contains_key(&session_id) {
            session_id = Uuid::new_v4();
        }
        let state = SessionState::new(session_id, skills, questions);
        sessions.insert(
            session_id,
            SessionHandle {
                turn: Arc::new(Mutex::new(())),
                state: Arc::new(Mutex::new(state)),
            },
        );
        debug!("Session {session_id} stored ({} live)", sessions.len());
        session_id
    }

    /// Returns a snapshot of the last committed state. Does not wait for an
    /// in-flight turn.
    pub async fn get(&self, session_id: Uuid) -> Result<SessionState, InterviewError> {
        let handle = self.handle(session_id).await?;
        let state = handle.state.lock().await;
        Ok(state.clone())
    }

    /// Waits for any in-flight turn on the session, then claims it.
    pub async fn begin_turn(&self, session_id: Uuid) -> Result<SessionTurn, InterviewError> {
        let handle = self.handle(session_id).await?;
        let turn = handle.turn.lock_owned().await;
        Ok(SessionTurn {
            _turn: turn,
            state: handle.state,
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn handle(&self, session_id: Uuid) -> Result<SessionHandle, InterviewError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&session_id)
            .cloned()
            .ok_or(InterviewError::NotFound(session_id))
    }
}
