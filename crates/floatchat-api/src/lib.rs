//! FloatChat API crate - axum HTTP server exposing chat sessions.
//!
//! A host UI opens a session, submits messages, and polls the transcript
//! while the assistant reply is pending.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
