mod commands;
mod dialogs;
mod logging;
mod navigator;
mod render;
mod repl;
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tutor_application::{ChatBackends, ChatSessionEngine, PreferencesService, UiBindings};
use tutor_core::interaction::ChannelDialogs;
use tutor_infrastructure::{ConfigService, HttpBackend, TomlPreferenceStore};

use crate::navigator::TerminalNavigator;
use crate::render::TerminalRenderer;
use crate::repl::Repl;
use crate::terminal::Terminal;

/// Terminal client for the math tutor.
#[derive(Parser, Debug)]
#[command(name = "tutor", version, about)]
struct Cli {
    /// Config file (defaults to ~/.config/tutor/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Server base URL, overriding the config file and environment
    #[arg(long)]
    base_url: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose);

    let config_service = match cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let mut config = config_service
        .load()
        .with_context(|| format!("Failed to load config from {:?}", config_service.path()))?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    tracing::info!("[Main] Using server {}", config.base_url);

    let backend = Arc::new(HttpBackend::new(config.clone())?);

    let preferences = PreferencesService::new(Arc::new(TomlPreferenceStore::new()?));
    let renderer = Arc::new(TerminalRenderer::new(preferences.load()));
    let (navigator, left) = TerminalNavigator::new(backend.login_url(), backend.logout_url());
    let (dialogs, requests) = ChannelDialogs::new();

    let terminal = Terminal::new()?;
    let dialog_task = tokio::spawn(dialogs::serve(requests, terminal.clone()));

    let engine = Arc::new(ChatSessionEngine::new(
        ChatBackends::shared(backend),
        UiBindings {
            dialogs: Arc::new(dialogs),
            renderer: renderer.clone(),
            navigator: Arc::new(navigator),
        },
        &config,
    ));

    // An expired session was already reported and sent to login.
    if engine.load().await.is_ok() {
        let mut repl = Repl::new(engine.clone(), renderer, preferences, terminal, left);
        repl.run().await?;
    }

    engine.sync().flush().await;
    dialog_task.abort();
    Ok(())
}
