//! Chat configuration.
//!
//! Settings come from the `[chat]` table of `config/default.toml` and are
//! then overridden by environment variables:
//!
//! | variable                | field      |
//! |-------------------------|------------|
//! | `OPENAI_API_KEY`        | `api_key`  |
//! | `CHATMARK_API_KEY`      | `api_key` (takes precedence) |
//! | `CHATMARK_API_BASE_URL` | `base_url` |
//! | `CHATMARK_MODEL`        | `model`    |
//! | `CHATMARK_STORE`        | `store`    |
//!
//! The API key is never read from the file.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{AgentError, Result};
use crate::llm::{CompletionConfig, DEFAULT_MODEL, OPENAI_BASE_URL};

/// Resolved chat settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Model identifier.
    pub model: String,
    /// Completion endpoint base URL.
    pub base_url: String,
    /// Value of the request's `store` flag.
    pub store: bool,
    /// Bearer token; only ever set from the environment.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_owned(),
            base_url: OPENAI_BASE_URL.to_owned(),
            store: true,
            api_key: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    chat: ChatConfig,
}

impl ChatConfig {
    /// Parse the `[chat]` table out of a TOML document. Other tables are
    /// ignored; a missing `[chat]` table yields the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.chat)
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let config = Self::from_toml_str(&content)?;
                debug!(path = %path.display(), model = %config.model, "loaded chat config");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(AgentError::ConfigError {
                reason: format!("failed to read {}: {e}", path.display()),
            }),
        }
    }

    /// Apply overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(env_non_empty)
    }

    /// Apply overrides from `lookup`, which maps a variable name to its
    /// value. Empty values count as unset.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(key) = get("CHATMARK_API_KEY").or_else(|| get("OPENAI_API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(url) = get("CHATMARK_API_BASE_URL") {
            self.base_url = url;
        }
        if let Some(model) = get("CHATMARK_MODEL") {
            self.model = model;
        }
        if let Some(raw) = get("CHATMARK_STORE") {
            match parse_bool(&raw) {
                Some(store) => self.store = store,
                None => warn!(value = %raw, "ignoring invalid CHATMARK_STORE"),
            }
        }

        self
    }

    /// Build the client configuration. Fails when no API key is set.
    pub fn completion_config(&self) -> Result<CompletionConfig> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| AgentError::MissingApiKey {
                provider: "openai".into(),
            })?;

        Ok(CompletionConfig {
            api_key,
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            store: self.store,
        })
    }
}

/// Read an environment variable, treating empty values as unset.
pub fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
