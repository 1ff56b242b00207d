//! Bearer-token extractor and standalone verifier.

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use fixlearn_core::{model::ModelClient, store::SessionStore};
use sha2::{Digest, Sha256};

use crate::{AppState, error::Error};

/// The token accepted by this server instance, kept only as a digest.
#[derive(Clone)]
pub struct AuthConfig {
  token_digest: [u8; 32],
}

impl AuthConfig {
  pub fn new(token: &str) -> Self {
    Self { token_digest: Sha256::digest(token.as_bytes()).into() }
  }

  /// Tokens are compared by digest so the comparison time does not depend
  /// on how many leading bytes of the secret match.
  fn accepts(&self, candidate: &str) -> bool {
    let digest: [u8; 32] = Sha256::digest(candidate.as_bytes()).into();
    digest == self.token_digest
  }
}

/// Zero-size marker: present in the handler means the request was authenticated.
pub struct Authenticated;

/// Verify `Authorization: Bearer <token>` against `config`.
pub fn verify_bearer(headers: &HeaderMap, config: &AuthConfig) -> Result<(), Error> {
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let (scheme, token) = header_val.split_once(' ').ok_or(Error::Unauthorized)?;
  if !scheme.eq_ignore_ascii_case("bearer") {
    return Err(Error::Unauthorized);
  }

  let token = token.trim();
  if token.is_empty() || !config.accepts(token) {
    return Err(Error::Unauthorized);
  }
  Ok(())
}

impl<S, M> FromRequestParts<AppState<S, M>> for Authenticated
where
  S: SessionStore + 'static,
  M: ModelClient + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, M>,
  ) -> Result<Self, Self::Rejection> {
    verify_bearer(&parts.headers, &state.auth).inspect_err(|_| {
      tracing::warn!(path = %parts.uri.path(), "rejected request with invalid bearer token");
    })?;
    Ok(Authenticated)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    h
  }

  #[test]
  fn correct_token() {
    let cfg = AuthConfig::new("secret");
    assert!(verify_bearer(&headers("Bearer secret"), &cfg).is_ok());
  }

  #[test]
  fn scheme_is_case_insensitive() {
    let cfg = AuthConfig::new("secret");
    assert!(verify_bearer(&headers("bearer secret"), &cfg).is_ok());
  }

  #[test]
  fn wrong_token() {
    let cfg = AuthConfig::new("secret");
    assert!(matches!(
      verify_bearer(&headers("Bearer secre"), &cfg),
      Err(Error::Unauthorized)
    ));
  }

  #[test]
  fn missing_header() {
    let cfg = AuthConfig::new("secret");
    assert!(matches!(
      verify_bearer(&HeaderMap::new(), &cfg),
      Err(Error::Unauthorized)
    ));
  }

  #[test]
  fn basic_scheme_is_rejected() {
    let cfg = AuthConfig::new("secret");
    assert!(matches!(
      verify_bearer(&headers("Basic secret"), &cfg),
      Err(Error::Unauthorized)
    ));
  }

  #[test]
  fn empty_token_is_rejected_even_if_configured_empty() {
    let cfg = AuthConfig::new("");
    assert!(matches!(
      verify_bearer(&headers("Bearer "), &cfg),
      Err(Error::Unauthorized)
    ));
  }
}
