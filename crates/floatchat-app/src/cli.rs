//! CLI argument definitions for the FloatChat binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::{Path, PathBuf};

use floatchat_core::{FloatChatConfig, FloatChatError};

/// Default API port when neither flag, env nor config sets one.
const DEFAULT_PORT: u16 = 3030;

/// FloatChat - ask about ARGO float data in plain language.
#[derive(Parser, Debug)]
#[command(name = "floatchat", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Chat in the terminal instead of serving the HTTP API.
    #[arg(long = "repl")]
    pub repl: bool,

    /// Write the default configuration to the config path and exit.
    #[arg(long = "init-config")]
    pub init_config: bool,

    /// With --init-config, overwrite an existing configuration file.
    #[arg(long = "force", requires = "init_config")]
    pub force: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > FLOATCHAT_CONFIG env var > ~/.floatchat/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        self.config_path_from(std::env::var("FLOATCHAT_CONFIG").ok())
    }

    /// Resolve the API server port.
    ///
    /// Priority: --port flag > FLOATCHAT_PORT env var > config file value > 3030.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        self.port_from(std::env::var("FLOATCHAT_PORT").ok(), config_port)
    }

    fn config_path_from(&self, env_value: Option<String>) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Some(p) = env_value.filter(|p| !p.is_empty()) {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    fn port_from(&self, env_value: Option<String>, config_port: u16) -> u16 {
        if let Some(p) = self.port {
            return p;
        }
        if let Some(p) = env_value.and_then(|v| v.trim().parse::<u16>().ok()) {
            return p;
        }
        if config_port != 0 {
            return config_port;
        }
        DEFAULT_PORT
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Write the default configuration to `path`.
///
/// An existing file is left untouched unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<(), FloatChatError> {
    if path.exists() && !force {
        return Err(FloatChatError::Config(format!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        )));
    }
    FloatChatConfig::default().save(path)
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".floatchat").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".floatchat").join("config.toml");
    }
    PathBuf::from("config.toml")
}
