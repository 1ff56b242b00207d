//! [`SqliteStore`] — the SQLite implementation of [`SessionStore`].

use std::path::Path;

use chrono::{SubsecRound as _, Utc};
use fixlearn_core::{
  message::{MessageRecord, NewMessage},
  store::SessionStore,
};
use uuid::Uuid;

use crate::{
  Result,
  encode::{RawMessage, encode_body, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A message log backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── SessionStore impl ───────────────────────────────────────────────────────

impl SessionStore for SqliteStore {
  type Error = crate::Error;

  async fn append_message(&self, input: NewMessage) -> Result<MessageRecord> {
    // Truncated to the stored precision so the returned record matches a read.
    let record = MessageRecord {
      id:         Uuid::new_v4(),
      created_at: Utc::now().trunc_subsecs(6),
      session_id: input.session_id,
      message:    input.message,
    };

    let id_str      = encode_uuid(record.id);
    let at_str      = encode_dt(record.created_at);
    let session_str = record.session_id.clone();
    let body_str    = encode_body(&record.message)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO messages (id, created_at, session_id, message)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, at_str, session_str, body_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn recent_messages(
    &self,
    session_id: &str,
    limit:      usize,
  ) -> Result<Vec<MessageRecord>> {
    let session_str = session_id.to_owned();
    let limit_val   = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws: Vec<RawMessage> = self
      .conn
      .call(move |conn| {
        // rowid breaks ties between appends within the same microsecond.
        let mut stmt = conn.prepare(
          "SELECT id, created_at, session_id, message
           FROM messages
           WHERE session_id = ?1
           ORDER BY created_at DESC, rowid DESC
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![session_str, limit_val], |row| {
            Ok(RawMessage {
              id:         row.get(0)?,
              created_at: row.get(1)?,
              session_id: row.get(2)?,
              message:    row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut records = raws
      .into_iter()
      .map(RawMessage::into_record)
      .collect::<Result<Vec<_>>>()?;
    records.reverse();
    Ok(records)
  }
}
