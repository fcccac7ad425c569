//! HTTP surface: routes, shared state and the serve loop.

mod ai;
mod auth;
mod content;
pub mod error;
mod history;

pub use auth::current_session;
pub use error::ApiError;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::{CredentialVerifier, SessionSigner};
use crate::cms::ContentSource;
use crate::dispatcher::Dispatcher;
use crate::history::History;

/// Collaborators shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub sessions: Arc<SessionSigner>,
    pub history: Option<Arc<dyn History>>,
    pub content: Option<Arc<dyn ContentSource>>,
    /// Add `Secure` to session cookies (serve over HTTPS only).
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(
        dispatcher: Dispatcher,
        verifier: Arc<dyn CredentialVerifier>,
        sessions: SessionSigner,
    ) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            verifier,
            sessions: Arc::new(sessions),
            history: None,
            content: None,
            secure_cookies: false,
        }
    }

    pub fn with_history(mut self, history: Arc<dyn History>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_content(mut self, content: Arc<dyn ContentSource>) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/ai", post(ai::process))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/session", get(auth::session))
        .route("/api/page", get(content::page))
        .route("/api/history", get(history::list).delete(history::clear))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until Ctrl+C.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
        .context("server error")?;
    Ok(())
}
