//! FloatChat binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialise tracing
//! 3. Either serve the HTTP chat API or run a terminal chat session

mod cli;
mod repl;

use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;

use floatchat_api::{start_server, AppState};
use floatchat_chat::{ChatSession, ResponseDispatcher};
use floatchat_core::FloatChatConfig;

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    if args.init_config {
        let path = args.resolve_config_path();
        cli::write_default_config(&path, args.force)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    // Config is read before tracing is up, so a load failure is reported
    // below once the subscriber exists.
    let config_file = args.resolve_config_path();
    let loaded = FloatChatConfig::load(&config_file);

    let mut config = loaded.as_ref().cloned().unwrap_or_default();
    config.general.port = args.resolve_port(config.general.port);
    config.general.log_level = args.resolve_log_level(&config.general.log_level);

    // Logs go to stderr so they never interleave with the terminal chat.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting FloatChat v{}", env!("CARGO_PKG_VERSION"));
    match &loaded {
        Ok(_) => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Err(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config, using defaults"
        ),
    }

    let dispatcher = ResponseDispatcher::default();

    if args.repl {
        let session = Arc::new(ChatSession::from_config(dispatcher, &config.chat));
        repl::run(session, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
        return Ok(());
    }

    let state = AppState::with_dispatcher(config.clone(), dispatcher);
    start_server(&config, state).await?;
    Ok(())
}
