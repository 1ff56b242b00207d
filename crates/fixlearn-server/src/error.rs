//! Error types and axum `IntoResponse` implementation.
//!
//! Every failure body is `{"success": false, "error": "..."}`. Internal
//! detail (provider messages, database errors) goes to the log, never to the
//! client.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use fixlearn_core::{fix::FailureResponse, model::ModelError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("model error: {0}")]
  Model(#[from] ModelError),
  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<fixlearn_core::Error> for Error {
  fn from(e: fixlearn_core::Error) -> Self { Error::BadRequest(e.to_string()) }
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
  (status, Json(FailureResponse::new(message))).into_response()
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res =
          failure(StatusCode::UNAUTHORIZED, "Invalid authentication token");
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Bearer"),
        );
        res
      }
      Error::BadRequest(msg) => failure(StatusCode::BAD_REQUEST, msg),
      Error::Model(_) => failure(
        StatusCode::BAD_GATEWAY,
        "The code analysis service is unavailable. Please try again later.",
      ),
      Error::Internal(e) => {
        tracing::error!(error = %e, "internal error");
        failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
      }
    }
  }
}
