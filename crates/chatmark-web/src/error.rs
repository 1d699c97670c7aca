//! Web server error types.

/// Errors raised while configuring or running the web server.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// The TCP listener could not be bound.
    #[error("failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },

    /// The server stopped with an I/O error.
    #[error("server error: {reason}")]
    Serve { reason: String },

    /// The `[web]` configuration could not be read.
    #[error("config error: {reason}")]
    Config { reason: String },
}

/// Convenience alias used throughout the web crate.
pub type Result<T> = std::result::Result<T, WebError>;

impl From<toml::de::Error> for WebError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config {
            reason: err.to_string(),
        }
    }
}
