use thiserror::Error;

/// Top-level error type for FloatChat.
///
/// Subsystem crates define their own error types; this one covers the
/// concerns shared by every binary: configuration and file I/O.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FloatChatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Server(String),
}

impl From<toml::de::Error> for FloatChatError {
    fn from(err: toml::de::Error) -> Self {
        FloatChatError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for FloatChatError {
    fn from(err: toml::ser::Error) -> Self {
        FloatChatError::Config(err.to_string())
    }
}

/// A specialized `Result` type for FloatChat operations.
pub type Result<T> = std::result::Result<T, FloatChatError>;
