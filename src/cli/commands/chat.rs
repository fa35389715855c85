use anyhow::{Context, Result};
use std::io::{self, IsTerminal};

use crate::chat::{ChatSession, PipedLines, SessionConfig, TerminalLines};
use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};
use crate::engine::CompletionEngine;
use crate::ui::{Spinner, Style};

/// Loads the engine once, then runs the chat loop on stdin/stdout.
pub async fn run_chat(options: &ResolveOptions) -> Result<()> {
    let config = load_resolved_config(options)?;
    let engine = load_engine(&config).await?;
    tracing::debug!(model = engine.model(), endpoint = engine.endpoint(), "starting session");

    let session_config = SessionConfig::new(config.generation, config.on_error);
    let mut session = ChatSession::new(&engine, session_config);
    let mut stdout = io::stdout();

    if io::stdin().is_terminal() {
        session.run(&mut TerminalLines::new(), &mut stdout).await
    } else {
        let mut lines = PipedLines::new(io::stdin().lock(), io::stdout());
        session.run(&mut lines, &mut stdout).await
    }
}

fn load_resolved_config(options: &ResolveOptions) -> Result<ResolvedConfig> {
    let manager = ConfigManager::new()?;
    let file_config = manager.load_optional()?;
    Ok(resolve_config(options, &file_config)?)
}

async fn load_engine(config: &ResolvedConfig) -> Result<CompletionEngine> {
    let model = &config.engine.model;
    crate::status!(
        "Loading {} from {}",
        Style::value(model),
        Style::secondary(&config.engine.endpoint)
    );

    let spinner = Spinner::new(format!("Loading {model}..."));
    let engine = CompletionEngine::load(config.engine.clone())
        .await
        .with_context(|| format!("Failed to load model '{model}'"))?;
    spinner.stop();

    Ok(engine)
}
