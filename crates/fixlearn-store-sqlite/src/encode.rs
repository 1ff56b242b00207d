//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings so that lexical
//! order equals chronological order. The message payload is compact JSON.

use chrono::{DateTime, SecondsFormat, Utc};
use fixlearn_core::message::{MessageBody, MessageRecord};
use uuid::Uuid;

use crate::{Error, Result};

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_body(body: &MessageBody) -> Result<String> {
  Ok(serde_json::to_string(body)?)
}

/// Raw strings read directly from a `messages` row.
pub struct RawMessage {
  pub id:         String,
  pub created_at: String,
  pub session_id: String,
  pub message:    String,
}

impl RawMessage {
  pub fn into_record(self) -> Result<MessageRecord> {
    Ok(MessageRecord {
      id:         decode_uuid(&self.id)?,
      created_at: decode_dt(&self.created_at)?,
      session_id: self.session_id,
      message:    serde_json::from_str(&self.message)?,
    })
  }
}
