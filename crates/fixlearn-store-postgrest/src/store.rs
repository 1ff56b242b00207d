//! [`PostgrestStore`] — a [`SessionStore`] speaking the PostgREST protocol.

use std::time::Duration;

use chrono::{DateTime, Utc};
use fixlearn_core::{
  message::{MessageBody, MessageRecord, NewMessage},
  store::SessionStore,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

const TABLE: &str = "messages";

/// A message log stored in a remote PostgREST table.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct PostgrestStore {
  client:   Client,
  /// `https://<project>.supabase.co/rest/v1`, without a trailing slash.
  rest_url: String,
  key:      String,
}

/// Row shape shared by inserts and selects.
#[derive(Serialize, Deserialize)]
struct Row {
  id:         Uuid,
  created_at: DateTime<Utc>,
  session_id: String,
  message:    MessageBody,
}

impl From<Row> for MessageRecord {
  fn from(r: Row) -> Self {
    MessageRecord {
      id:         r.id,
      created_at: r.created_at,
      session_id: r.session_id,
      message:    r.message,
    }
  }
}

impl PostgrestStore {
  /// `base_url` is either the project URL or its `/rest/v1` endpoint; `key`
  /// is sent both as `apikey` and as the bearer token.
  pub fn new(base_url: &str, key: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(15))
      .build()?;
    let base = base_url.trim_end_matches('/');
    let rest_url = if base.ends_with("/rest/v1") {
      base.to_owned()
    } else {
      format!("{base}/rest/v1")
    };
    Ok(Self { client, rest_url, key: key.into() })
  }

  fn table_url(&self) -> String { format!("{}/{TABLE}", self.rest_url) }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    req.header("apikey", &self.key).bearer_auth(&self.key)
  }
}

async fn check(resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body = resp.text().await.unwrap_or_default();
  Err(Error::Status { status: status.as_u16(), body })
}

// ─── SessionStore impl ───────────────────────────────────────────────────────

impl SessionStore for PostgrestStore {
  type Error = Error;

  async fn append_message(&self, input: NewMessage) -> Result<MessageRecord> {
    let row = Row {
      id:         Uuid::new_v4(),
      created_at: Utc::now(),
      session_id: input.session_id,
      message:    input.message,
    };

    let resp = self
      .auth(self.client.post(self.table_url()))
      .header("Prefer", "return=minimal")
      .json(&row)
      .send()
      .await?;
    check(resp).await?;

    Ok(row.into())
  }

  async fn recent_messages(
    &self,
    session_id: &str,
    limit:      usize,
  ) -> Result<Vec<MessageRecord>> {
    let resp = self
      .auth(self.client.get(self.table_url()))
      .query(&[
        ("select", "id,created_at,session_id,message".to_owned()),
        ("session_id", format!("eq.{session_id}")),
        ("order", "created_at.desc".to_owned()),
        ("limit", limit.to_string()),
      ])
      .send()
      .await?;
    let text = check(resp).await?.text().await?;

    let rows: Vec<Row> = serde_json::from_str(&text)?;
    let mut records: Vec<MessageRecord> = rows.into_iter().map(Into::into).collect();
    records.reverse();
    Ok(records)
  }
}
