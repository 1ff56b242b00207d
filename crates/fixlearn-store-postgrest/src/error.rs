//! Error type for `fixlearn-store-postgrest`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// PostgREST answered with a non-success status (constraint violation,
  /// bad key, missing table).
  #[error("postgrest returned {status}: {body}")]
  Status { status: u16, body: String },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
