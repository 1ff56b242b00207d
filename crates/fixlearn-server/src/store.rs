//! Runtime selection of the message store backend.

use std::path::{Path, PathBuf};

use fixlearn_core::{
  message::{MessageRecord, NewMessage},
  store::SessionStore,
};
use fixlearn_store_postgrest::PostgrestStore;
use fixlearn_store_sqlite::SqliteStore;
use thiserror::Error;

use crate::config::DatabaseTarget;

/// The configured backend. `SessionStore` is not object-safe, so the choice
/// made at startup is dispatched through this enum.
#[derive(Clone)]
pub enum AnyStore {
  Sqlite(SqliteStore),
  Postgrest(PostgrestStore),
}

#[derive(Debug, Error)]
pub enum AnyStoreError {
  #[error(transparent)]
  Sqlite(#[from] fixlearn_store_sqlite::Error),
  #[error(transparent)]
  Postgrest(#[from] fixlearn_store_postgrest::Error),
}

impl AnyStore {
  /// Open the backend named by `target`. `key` is only used by PostgREST.
  pub async fn connect(
    target: &DatabaseTarget,
    key: Option<&str>,
  ) -> Result<Self, AnyStoreError> {
    Ok(match target {
      DatabaseTarget::SqliteMemory => Self::Sqlite(SqliteStore::open_in_memory().await?),
      DatabaseTarget::SqliteFile(path) => {
        Self::Sqlite(SqliteStore::open(expand_tilde(path)).await?)
      }
      DatabaseTarget::Postgrest(url) => {
        Self::Postgrest(PostgrestStore::new(url, key.unwrap_or_default())?)
      }
    })
  }
}

impl SessionStore for AnyStore {
  type Error = AnyStoreError;

  async fn append_message(&self, input: NewMessage) -> Result<MessageRecord, AnyStoreError> {
    Ok(match self {
      Self::Sqlite(s) => s.append_message(input).await?,
      Self::Postgrest(s) => s.append_message(input).await?,
    })
  }

  async fn recent_messages(
    &self,
    session_id: &str,
    limit: usize,
  ) -> Result<Vec<MessageRecord>, AnyStoreError> {
    Ok(match self {
      Self::Sqlite(s) => s.recent_messages(session_id, limit).await?,
      Self::Postgrest(s) => s.recent_messages(session_id, limit).await?,
    })
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
