//! Handler for `GET /api/sessions/{session_id}/messages`.

use axum::{
  Json,
  extract::{Path, Query, State, rejection::QueryRejection},
};
use fixlearn_core::{message::MessageRecord, model::ModelClient, store::SessionStore};
use serde::Deserialize;

use crate::{AppState, auth::Authenticated, error::Error};

const MAX_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Number of most recent messages to return; defaults to `history_limit`.
  pub limit: Option<usize>,
}

/// `GET /api/sessions/{session_id}/messages[?limit=N]` — oldest first.
pub async fn list<S, M>(
  State(state): State<AppState<S, M>>,
  _auth: Authenticated,
  Path(session_id): Path<String>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<MessageRecord>>, Error>
where
  S: SessionStore + 'static,
  M: ModelClient + 'static,
{
  let Query(params) = params.map_err(|e| Error::BadRequest(e.body_text()))?;
  let limit = params
    .limit
    .unwrap_or(state.config.history_limit)
    .clamp(1, MAX_LIMIT);

  let messages = state
    .store
    .recent_messages(&session_id, limit)
    .await
    .map_err(|e| Error::Internal(Box::new(e)))?;
  Ok(Json(messages))
}
