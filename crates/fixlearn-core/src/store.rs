//! The `SessionStore` trait.
//!
//! Implemented by storage backends (`fixlearn-store-sqlite`,
//! `fixlearn-store-postgrest`). The server depends on this abstraction, not on
//! a concrete backend.

use std::future::Future;

use crate::message::{MessageRecord, NewMessage};

/// Append-only message log grouped by session identifier.
///
/// Appends are independent inserts: two concurrent appends to the same
/// session both land, in either order. Nothing is ever updated or deleted.
pub trait SessionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new message and return the stored record. `id` and
  /// `created_at` are assigned by the store.
  fn append_message(
    &self,
    input: NewMessage,
  ) -> impl Future<Output = Result<MessageRecord, Self::Error>> + Send + '_;

  /// The newest `limit` messages of a session, oldest first.
  fn recent_messages<'a>(
    &'a self,
    session_id: &'a str,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<MessageRecord>, Self::Error>> + Send + 'a;
}
