//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use floatchat_chat::{ResponseDispatcher, SessionRegistry};
use floatchat_core::FloatChatConfig;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<FloatChatConfig>,
    /// Open chat sessions.
    pub sessions: Arc<SessionRegistry>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Create state with the built-in ARGO dispatcher.
    pub fn new(config: FloatChatConfig) -> Self {
        Self::with_dispatcher(config, ResponseDispatcher::default())
    }

    pub fn with_dispatcher(config: FloatChatConfig, dispatcher: ResponseDispatcher) -> Self {
        let sessions = SessionRegistry::new(dispatcher, config.chat.clone());
        Self {
            config: Arc::new(config),
            sessions: Arc::new(sessions),
            start_time: Instant::now(),
        }
    }
}
