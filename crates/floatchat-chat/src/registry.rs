//! Registry of open chat sessions, keyed by session id.
//!
//! Each session owns its transcript; the registry only hands out shared
//! handles. The map lock is held for lookups and inserts only, never while a
//! reply is being produced.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use floatchat_core::ChatConfig;

use crate::dispatcher::ResponseDispatcher;
use crate::error::ChatError;
use crate::session::ChatSession;

/// Owns every open [`ChatSession`] for a server process.
#[derive(Debug)]
pub struct SessionRegistry {
    dispatcher: ResponseDispatcher,
    config: ChatConfig,
    sessions: Mutex<HashMap<Uuid, Arc<ChatSession>>>,
}

impl SessionRegistry {
    /// Create an empty registry. New sessions are built from `config`.
    pub fn new(dispatcher: ResponseDispatcher, config: ChatConfig) -> Self {
        Self {
            dispatcher,
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Open a new session, seeded per configuration.
    pub fn create(&self) -> Result<Arc<ChatSession>, ChatError> {
        let mut sessions = self.lock()?;
        if sessions.len() >= self.config.max_sessions {
            tracing::warn!(
                max_sessions = self.config.max_sessions,
                "Session limit reached"
            );
            return Err(ChatError::SessionLimit(self.config.max_sessions));
        }

        let session = Arc::new(ChatSession::from_config(
            self.dispatcher.clone(),
            &self.config,
        ));
        sessions.insert(session.id(), Arc::clone(&session));
        Ok(session)
    }

    /// Look up an open session.
    pub fn get(&self, id: Uuid) -> Result<Arc<ChatSession>, ChatError> {
        self.lock()?
            .get(&id)
            .cloned()
            .ok_or(ChatError::SessionNotFound(id))
    }

    /// Close a session. A reply still in flight finishes on its own handle.
    pub fn remove(&self, id: Uuid) -> Result<(), ChatError> {
        match self.lock()?.remove(&id) {
            Some(_) => {
                tracing::info!(session_id = %id, "Chat session closed");
                Ok(())
            }
            None => Err(ChatError::SessionNotFound(id)),
        }
    }

    /// Number of open sessions. Still counts after a poisoned lock, since
    /// the map itself is never left half-updated.
    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Arc<ChatSession>>>, ChatError> {
        self.sessions
            .lock()
            .map_err(|e| ChatError::LockPoisoned(e.to_string()))
    }
}
