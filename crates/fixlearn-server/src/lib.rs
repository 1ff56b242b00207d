//! HTTP gateway for Fix&Learn.
//!
//! Exposes an axum [`Router`] backed by any [`SessionStore`] and
//! [`ModelClient`]. Both are held behind `Arc` in [`AppState`] so tests can
//! swap in deterministic fakes.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod pipeline;
pub mod store;

pub use config::ServerConfig;
pub use error::Error;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use fixlearn_core::{model::ModelClient, store::SessionStore};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use auth::AuthConfig;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, M> {
  pub store:  Arc<S>,
  pub model:  Arc<M>,
  pub config: Arc<ServerConfig>,
  pub auth:   Arc<AuthConfig>,
}

impl<S, M> Clone for AppState<S, M> {
  fn clone(&self) -> Self {
    Self {
      store:  self.store.clone(),
      model:  self.model.clone(),
      config: self.config.clone(),
      auth:   self.auth.clone(),
    }
  }
}

impl<S, M> AppState<S, M> {
  pub fn new(store: Arc<S>, model: Arc<M>, config: ServerConfig) -> Self {
    let auth = AuthConfig::new(&config.api_bearer_token);
    Self {
      store,
      model,
      config: Arc::new(config),
      auth: Arc::new(auth),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the service.
pub fn router<S, M>(state: AppState<S, M>) -> Router
where
  S: SessionStore + 'static,
  M: ModelClient + 'static,
{
  Router::new()
    .route("/api/fix-and-learn", post(handlers::fix::handler::<S, M>))
    .route(
      "/api/sessions/{session_id}/messages",
      get(handlers::sessions::list::<S, M>),
    )
    .route("/health", get(handlers::health::handler))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
