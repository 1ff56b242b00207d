//! Persisted conversation messages.
//!
//! Messages are append-only. A record is never updated or deleted once
//! written; the only ordering guarantee is by `created_at` within a session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::fix::{FixResponse, FixSubmission};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Human,
  Ai,
}

/// The structured JSON payload stored in the `message` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
  pub role:    Role,
  pub content: String,
  /// Extra structured context (request id, concepts, error kind).
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data:    Option<serde_json::Value>,
}

/// A stored message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
  pub id:         Uuid,
  /// Store-assigned timestamp; never changes after creation.
  pub created_at: DateTime<Utc>,
  pub session_id: String,
  pub message:    MessageBody,
}

/// Input to [`crate::store::SessionStore::append_message`].
/// `id` and `created_at` are always set by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
  pub session_id: String,
  pub message:    MessageBody,
}

/// Content stored for the AI side when the model could not be reached.
pub const APOLOGY: &str =
  "I apologize, but I encountered an error processing your request.";

impl NewMessage {
  /// The user's side of an interaction: the code, with the error text in
  /// `data`.
  pub fn human(submission: &FixSubmission) -> Self {
    Self {
      session_id: submission.session_id.clone(),
      message:    MessageBody {
        role:    Role::Human,
        content: submission.code.clone(),
        data:    Some(json!({
          "error":      submission.error,
          "request_id": submission.request_id,
        })),
      },
    }
  }

  /// The model's side of a completed interaction.
  pub fn ai(submission: &FixSubmission, response: &FixResponse) -> Self {
    Self {
      session_id: submission.session_id.clone(),
      message:    MessageBody {
        role:    Role::Ai,
        content: response.fixed_code.clone(),
        data:    Some(json!({
          "concepts":   response.concepts,
          "partial":    response.partial,
          "request_id": submission.request_id,
        })),
      },
    }
  }

  /// Recorded in place of an AI reply when the model call failed.
  /// `error_kind` is a short machine label, not the provider's message.
  pub fn ai_failure(submission: &FixSubmission, error_kind: &str) -> Self {
    Self {
      session_id: submission.session_id.clone(),
      message:    MessageBody {
        role:    Role::Ai,
        content: APOLOGY.to_owned(),
        data:    Some(json!({
          "error":      error_kind,
          "request_id": submission.request_id,
        })),
      },
    }
  }
}
