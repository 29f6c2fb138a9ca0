//! Conversational core for FloatChat.
//!
//! Maps user utterances to canned ARGO float answers, records the exchange
//! in an append-only transcript, and guards each session so that only one
//! reply is ever pending at a time.

pub mod dispatcher;
pub mod error;
pub mod prompts;
pub mod registry;
pub mod session;
pub mod state;
pub mod transcript;
pub mod types;

pub use dispatcher::ResponseDispatcher;
pub use error::ChatError;
pub use prompts::{QuickPrompt, QUICK_PROMPTS};
pub use registry::SessionRegistry;
pub use session::{ChatSession, PendingReply, Submission};
pub use state::SessionState;
pub use transcript::TranscriptStore;
pub use types::{Message, MessageId, Sender, Topic, TopicRule};
