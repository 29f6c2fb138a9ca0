use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

/// Greeting the assistant opens every new conversation with.
pub const DEFAULT_GREETING: &str = "Hello! I'm your ARGO data assistant. Ask me about ocean parameters, float locations, or data analysis.";

/// Top-level configuration for FloatChat.
///
/// Loaded from `~/.floatchat/config.toml` by default. Missing sections and
/// fields fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FloatChatConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl FloatChatConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FloatChatConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Address the API server binds to.
    pub bind: String,
    /// API server port.
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            bind: "127.0.0.1".to_string(),
            port: 3030,
        }
    }
}

/// Chat session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Simulated latency before the assistant reply is appended.
    pub reply_delay_ms: u64,
    /// Assistant message seeded into every new transcript. `None` starts empty.
    pub greeting: Option<String>,
    /// Upper bound on concurrently open sessions in the API server.
    pub max_sessions: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: 1500,
            greeting: Some(DEFAULT_GREETING.to_string()),
            max_sessions: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FloatChatError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = FloatChatConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.bind, "127.0.0.1");
        assert_eq!(config.general.port, 3030);
        assert_eq!(config.chat.reply_delay_ms, 1500);
        assert_eq!(config.chat.greeting.as_deref(), Some(DEFAULT_GREETING));
        assert_eq!(config.chat.max_sessions, 1000);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"
bind = "0.0.0.0"
port = 8080

[chat]
reply_delay_ms = 250
greeting = "Ahoy"
max_sessions = 4
"#;
        let file = create_temp_config(content);
        let config = FloatChatConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.bind, "0.0.0.0");
        assert_eq!(config.general.port, 8080);
        assert_eq!(config.chat.reply_delay_ms, 250);
        assert_eq!(config.chat.greeting.as_deref(), Some("Ahoy"));
        assert_eq!(config.chat.max_sessions, 4);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[chat]
reply_delay_ms = 0
"#;
        let file = create_temp_config(content);
        let config = FloatChatConfig::load(file.path()).unwrap();
        assert_eq!(config.chat.reply_delay_ms, 0);
        assert_eq!(config.chat.max_sessions, 1000);
        assert_eq!(config.general.port, 3030);
    }

    #[test]
    fn test_load_invalid_toml_is_config_error() {
        let file = create_temp_config("[general\nport = ");
        let err = FloatChatConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, FloatChatError::Config(_)));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = FloatChatConfig::load(Path::new("/nonexistent/floatchat.toml")).unwrap_err();
        assert!(matches!(err, FloatChatError::Io(_)));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = FloatChatConfig::default();
        config.chat.reply_delay_ms = 42;
        config.save(&path).unwrap();

        let reloaded = FloatChatConfig::load(&path).unwrap();
        assert_eq!(reloaded.chat.reply_delay_ms, 42);
        assert_eq!(reloaded.chat.greeting, config.chat.greeting);
        assert_eq!(reloaded.general.log_level, config.general.log_level);
    }
}
