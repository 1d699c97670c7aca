//! Web interface for chatmark.
//!
//! Serves the single-page chat UI and the JSON API it talks to:
//!
//! - `GET /` -- the embedded page.
//! - `GET /api/status`, `GET /api/messages` -- session state.
//! - `POST /api/chat`, `POST /api/new` -- submit and new chat.
//! - `POST /api/copy/{id}` -- run a code block's copy action.

pub mod api;
pub mod error;
pub mod frontend;
pub mod server;
pub mod state;

use std::path::Path;

use serde::Deserialize;

pub use error::{Result, WebError};
pub use server::WebServer;
pub use state::AppState;

/// Web server configuration, read from the `[web]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// The address to bind the HTTP server to.
    #[serde(rename = "bind")]
    pub bind_addr: String,
    /// The port to listen on.
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    web: WebConfig,
}

impl WebConfig {
    /// Parse the `[web]` table out of a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.web)
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(WebError::Config {
                reason: format!("failed to read {}: {e}", path.display()),
            }),
        }
    }

    /// The `host:port` string to bind.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}
