//! Error types for `fixlearn-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required request field was missing or contained only whitespace.
  #[error("field `{0}` must not be empty")]
  EmptyField(&'static str),
}

/// The completion did not contain anything recognisable as code.
///
/// Non-fatal: callers fall back to the raw completion text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
  #[error("no code section found in completion")]
  NoCode,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
