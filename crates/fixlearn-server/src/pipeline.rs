//! The fix-and-learn pipeline: prompt → model → parse → persist.
//!
//! Persistence never decides the outcome. A failed append is logged and the
//! already-produced fix is still returned.

use std::time::Duration;

use fixlearn_core::{
  fix::{FixResponse, FixSubmission},
  message::NewMessage,
  model::{ModelClient, ModelError},
  parse::parse_or_raw,
  prompt::build_prompt,
  store::SessionStore,
};
use tracing::Instrument as _;

use crate::{AppState, error::Error};

/// Run one submission through the pipeline.
pub async fn run<S, M>(
  state: &AppState<S, M>,
  submission: FixSubmission,
) -> Result<FixResponse, Error>
where
  S: SessionStore,
  M: ModelClient,
{
  let span = tracing::info_span!(
    "fix_and_learn",
    request_id = %submission.request_id,
    session_id = %submission.session_id,
  );

  async move {
    let prompt = build_prompt(&submission.code, &submission.error);
    let completion =
      complete_with_retry(&*state.model, &prompt, state.config.retry_backoff())
        .await
        .and_then(|text| {
          if text.trim().is_empty() {
            Err(ModelError::EmptyCompletion)
          } else {
            Ok(text)
          }
        });

    match completion {
      Ok(text) => {
        let parsed = parse_or_raw(&text);
        if parsed.partial {
          tracing::warn!("completion did not follow the section format; returning raw text");
        }
        let response = parsed.into_response();
        persist(&*state.store, [
          NewMessage::human(&submission),
          NewMessage::ai(&submission, &response),
        ])
        .await;
        tracing::info!(concepts = response.concepts.len(), partial = response.partial, "fix produced");
        Ok(response)
      }
      Err(e) => {
        tracing::error!(kind = e.kind(), error = %e, "model call failed");
        persist(&*state.store, [
          NewMessage::human(&submission),
          NewMessage::ai_failure(&submission, e.kind()),
        ])
        .await;
        Err(Error::Model(e))
      }
    }
  }
  .instrument(span)
  .await
}

/// Call the model, retrying once after `backoff` if the first attempt hit a
/// network failure. Upstream errors are returned as-is.
pub async fn complete_with_retry<M: ModelClient>(
  model: &M,
  prompt: &str,
  backoff: Duration,
) -> Result<String, ModelError> {
  match model.complete(prompt).await {
    Err(e) if e.is_transient() => {
      tracing::warn!(
        error = %e,
        backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
        "model call failed; retrying once",
      );
      tokio::time::sleep(backoff).await;
      model.complete(prompt).await
    }
    other => other,
  }
}

/// Append `messages` in order, logging (not propagating) failures.
async fn persist<S, const N: usize>(store: &S, messages: [NewMessage; N])
where
  S: SessionStore,
{
  for message in messages {
    let role = message.message.role;
    if let Err(e) = store.append_message(message).await {
      tracing::error!(?role, error = %e, "failed to persist message; response is degraded");
    }
  }
}
