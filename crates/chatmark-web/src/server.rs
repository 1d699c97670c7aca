//! Main web server setup and startup.
//!
//! [`WebServer`] composes the Axum router, registers all routes, and starts
//! the HTTP listener.

use std::sync::Arc;

use axum::Router;
use axum::http::Method;
use axum::response::Html;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use chatmark_agent::ChatSession;

use crate::WebConfig;
use crate::api;
use crate::error::{Result, WebError};
use crate::frontend::INDEX_HTML;
use crate::state::AppState;

/// The chatmark web server.
#[derive(Debug)]
pub struct WebServer {
    config: WebConfig,
    state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server in front of `session`.
    pub fn new(config: WebConfig, session: Arc<ChatSession>) -> Self {
        let state = Arc::new(AppState::new(session));
        Self { config, state }
    }

    /// Return the `host:port` string this server will bind to.
    pub fn addr(&self) -> String {
        self.config.addr()
    }

    /// Build the Axum router with all routes registered.
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.state))
    }

    /// Start the server and block until it is shut down.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot be bound.
    pub async fn start(self) -> Result<()> {
        let addr = self.addr();
        let router = self.router();

        let listener =
            tokio::net::TcpListener::bind(&addr)
                .await
                .map_err(|e| WebError::Bind {
                    addr: addr.clone(),
                    reason: e.to_string(),
                })?;

        tracing::info!(addr = %addr, "starting web server");

        axum::serve(listener, router)
            .await
            .map_err(|e| WebError::Serve {
                reason: e.to_string(),
            })
    }
}

/// The full route table over `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        // Embedded frontend.
        .route("/", get(|| async { Html(INDEX_HTML) }))
        // REST API.
        .route("/api/status", get(api::status))
        .route("/api/messages", get(api::messages))
        .route("/api/chat", post(api::chat))
        .route("/api/new", post(api::new_chat))
        .route("/api/copy/{id}", post(api::copy))
        .layer(cors)
        .with_state(state)
}
