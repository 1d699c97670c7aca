//! CLI argument definitions for chatmark.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// chatmark -- a chat client that renders markdown, math and code.
#[derive(Debug, Parser)]
#[command(
    name = "chatmark",
    version,
    about = "chatmark -- LLM chat with markdown, math and copyable code",
    long_about = "Serves a single-page chat UI backed by an OpenAI-compatible completion \
                  endpoint, or renders a markdown reply to sanitized HTML offline."
)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config/default.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the web server with the embedded chat UI.
    Serve {
        /// Address to bind the HTTP server to (overrides `[web] bind`).
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on (overrides `[web] port`).
        #[arg(long, short)]
        port: Option<u16>,

        /// Keep copied code in memory instead of the system clipboard.
        #[arg(long)]
        headless: bool,
    },

    /// Render a markdown reply to HTML and print it.
    Render {
        /// File to read; stdin when omitted.
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["chatmark", "serve"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
        match cli.command {
            Commands::Serve {
                bind,
                port,
                headless,
            } => {
                assert!(bind.is_none());
                assert!(port.is_none());
                assert!(!headless);
            }
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn serve_flags() {
        let cli = Cli::try_parse_from([
            "chatmark",
            "serve",
            "--bind",
            "0.0.0.0",
            "-p",
            "8080",
            "--headless",
            "--config",
            "other.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        match cli.command {
            Commands::Serve {
                bind,
                port,
                headless,
            } => {
                assert_eq!(bind.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(8080));
                assert!(headless);
            }
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn render_file_is_optional() {
        let cli = Cli::try_parse_from(["chatmark", "render"]).unwrap();
        assert!(matches!(cli.command, Commands::Render { file: None }));

        let cli = Cli::try_parse_from(["chatmark", "render", "reply.md"]).unwrap();
        match cli.command {
            Commands::Render { file } => assert_eq!(file, Some(PathBuf::from("reply.md"))),
            other => panic!("expected render, got {other:?}"),
        }
    }

    #[test]
    fn bad_port_is_rejected() {
        assert!(Cli::try_parse_from(["chatmark", "serve", "--port", "http"]).is_err());
    }
}
