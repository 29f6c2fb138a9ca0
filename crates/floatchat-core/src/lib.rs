//! Shared configuration and error types for FloatChat.

pub mod config;
pub mod error;

pub use config::{ChatConfig, FloatChatConfig, GeneralConfig};
pub use error::{FloatChatError, Result};
