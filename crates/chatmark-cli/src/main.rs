//! CLI entry point for chatmark.
//!
//! This binary provides the `chatmark` command with subcommands for serving
//! the chat UI and rendering replies offline.

mod cli;
mod helpers;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use chatmark_agent::{ChatConfig, ChatSession, OpenAiClient};
use chatmark_render::{CopyRegistry, MemoryClipboard, ReplyRenderer};
use chatmark_web::{WebConfig, WebServer};

use crate::cli::{Cli, Commands};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            port,
            headless,
        } => cmd_serve(&cli.config, bind, port, headless).await,
        Commands::Render { file } => cmd_render(file),
    }
}

// ---------------------------------------------------------------------------
// Subcommand: serve
// ---------------------------------------------------------------------------

async fn cmd_serve(
    config_path: &Path,
    bind: Option<String>,
    port: Option<u16>,
    headless: bool,
) -> Result<()> {
    helpers::init_tracing("info");
    helpers::load_env();

    let chat_config = ChatConfig::load(config_path)
        .context("failed to load chat configuration")?
        .with_env();
    let completion = chat_config
        .completion_config()
        .context("no API key found; set OPENAI_API_KEY or CHATMARK_API_KEY")?;
    let client = OpenAiClient::new(completion).context("failed to create completion client")?;
    info!(model = %client.model(), base_url = %chat_config.base_url, "completion client ready");

    let renderer = ReplyRenderer::new(
        Arc::new(CopyRegistry::new()),
        helpers::build_clipboard(headless),
    );
    let session = Arc::new(ChatSession::new(Arc::new(client), renderer));

    let mut web_config =
        WebConfig::load(config_path).context("failed to load web configuration")?;
    if let Some(bind) = bind {
        web_config.bind_addr = bind;
    }
    if let Some(port) = port {
        web_config.port = port;
    }

    println!();
    println!("  chatmark v{}", env!("CARGO_PKG_VERSION"));
    println!("  Open http://{} in your browser.", web_config.addr());
    println!();

    WebServer::new(web_config, session)
        .start()
        .await
        .context("web server failed")
}

// ---------------------------------------------------------------------------
// Subcommand: render
// ---------------------------------------------------------------------------

fn cmd_render(file: Option<PathBuf>) -> Result<()> {
    helpers::init_tracing("warn");

    let raw = helpers::read_input(file.as_deref())?;
    let registry = Arc::new(CopyRegistry::new());
    let renderer = ReplyRenderer::new(Arc::clone(&registry), Arc::new(MemoryClipboard::new()));

    let html = renderer.render(&raw);
    println!("{html}");
    info!(code_blocks = registry.len(), "rendered");

    Ok(())
}
