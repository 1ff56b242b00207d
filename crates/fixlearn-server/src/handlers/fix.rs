//! Handler for `POST /api/fix-and-learn`.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use fixlearn_core::{
  fix::{FixRequest, FixResponse},
  model::ModelClient,
  store::SessionStore,
};

use crate::{AppState, auth::Authenticated, error::Error, pipeline};

/// Authentication is checked before the body is read, so rejected requests
/// never reach the model or the store.
pub async fn handler<S, M>(
  State(state): State<AppState<S, M>>,
  _auth: Authenticated,
  body: Result<Json<FixRequest>, JsonRejection>,
) -> Result<Json<FixResponse>, Error>
where
  S: SessionStore + 'static,
  M: ModelClient + 'static,
{
  let Json(request) = body.map_err(|e| Error::BadRequest(e.body_text()))?;
  let submission = request.validate()?;
  let response = pipeline::run(&state, submission).await?;
  Ok(Json(response))
}
