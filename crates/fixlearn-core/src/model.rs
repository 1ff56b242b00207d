//! The `ModelClient` trait: send a prompt, receive a completion.
//!
//! Implemented by `fixlearn-model` for real providers and by test stubs.

use std::future::Future;

use thiserror::Error;

/// Failure talking to the model provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
  /// The request never produced an HTTP response (connect, timeout, reset).
  #[error("network error: {0}")]
  Network(String),

  /// The provider answered with a non-success status.
  #[error("upstream returned {status}: {message}")]
  Upstream { status: u16, message: String },

  /// A success status whose body was not a chat-completion payload.
  #[error("malformed completion payload: {0}")]
  MalformedResponse(String),

  #[error("completion contained no text")]
  EmptyCompletion,
}

impl ModelError {
  /// Only network failures are worth a second attempt.
  pub fn is_transient(&self) -> bool { matches!(self, Self::Network(_)) }

  /// Short label stored with failure records and logged as a field.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Network(_) => "network",
      Self::Upstream { .. } => "upstream",
      Self::MalformedResponse(_) => "malformed_response",
      Self::EmptyCompletion => "empty_completion",
    }
  }
}

/// Abstraction over a text-completion provider.
///
/// Each call is independent; implementations must not cache.
pub trait ModelClient: Send + Sync {
  /// Send `prompt` as a single user turn and return the completion text.
  fn complete<'a>(
    &'a self,
    prompt: &'a str,
  ) -> impl Future<Output = Result<String, ModelError>> + Send + 'a;
}
