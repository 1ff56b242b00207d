//! Request and response shapes for a fix-and-learn submission.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Request ─────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /api/fix-and-learn`.
///
/// `code` and `error` default to empty strings so that a missing field is
/// reported by [`FixRequest::validate`] rather than by the JSON decoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixRequest {
  #[serde(default)]
  pub code:       String,
  #[serde(default)]
  pub error:      String,
  /// Caller identity; doubles as the session key when `session_id` is absent.
  pub user_id:    Option<String>,
  pub session_id: Option<String>,
  /// Correlation id stored alongside the persisted messages.
  pub request_id: Option<String>,
}

/// A request that passed validation, with its session and request ids
/// resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixSubmission {
  pub code:       String,
  pub error:      String,
  pub session_id: String,
  pub request_id: String,
}

impl FixRequest {
  /// Check required fields and resolve identifiers.
  ///
  /// The session key is `session_id`, falling back to `user_id`, falling back
  /// to a fresh UUID. Whitespace-only values count as absent.
  pub fn validate(self) -> Result<FixSubmission> {
    if self.code.trim().is_empty() {
      return Err(Error::EmptyField("code"));
    }
    if self.error.trim().is_empty() {
      return Err(Error::EmptyField("error"));
    }

    let session_id = non_blank(self.session_id)
      .or_else(|| non_blank(self.user_id))
      .unwrap_or_else(|| Uuid::new_v4().to_string());
    let request_id =
      non_blank(self.request_id).unwrap_or_else(|| Uuid::new_v4().to_string());

    Ok(FixSubmission {
      code: self.code,
      error: self.error,
      session_id,
      request_id,
    })
  }
}

fn non_blank(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

// ─── Response ────────────────────────────────────────────────────────────────

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixResponse {
  pub success:    bool,
  pub fixed_code: String,
  pub concepts:   Vec<String>,
  /// Set when the completion did not follow the expected format and
  /// `fixed_code` holds the raw completion instead.
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub partial:    bool,
}

/// Failure response body: `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureResponse {
  pub success: bool,
  pub error:   String,
}

impl FailureResponse {
  pub fn new(error: impl Into<String>) -> Self {
    Self { success: false, error: error.into() }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn request(code: &str, error: &str) -> FixRequest {
    FixRequest {
      code: code.into(),
      error: error.into(),
      ..FixRequest::default()
    }
  }

  #[test]
  fn empty_code_is_rejected() {
    let err = request("", "NameError").validate().unwrap_err();
    assert!(matches!(err, Error::EmptyField("code")));
  }

  #[test]
  fn whitespace_error_is_rejected() {
    let err = request("print(x)", "  \n\t").validate().unwrap_err();
    assert!(matches!(err, Error::EmptyField("error")));
  }

  #[test]
  fn missing_fields_deserialize_as_empty() {
    let req: FixRequest = serde_json::from_str(r#"{"user_id":"u"}"#).unwrap();
    assert!(matches!(req.validate(), Err(Error::EmptyField("code"))));
  }

  #[test]
  fn session_prefers_session_id_over_user_id() {
    let mut req = request("x", "y");
    req.user_id = Some("user-1".into());
    req.session_id = Some("session-9".into());
    assert_eq!(req.validate().unwrap().session_id, "session-9");
  }

  #[test]
  fn session_falls_back_to_user_id() {
    let mut req = request("x", "y");
    req.user_id = Some("test-user".into());
    req.session_id = Some("   ".into());
    assert_eq!(req.validate().unwrap().session_id, "test-user");
  }

  #[test]
  fn session_is_generated_when_absent() {
    let sub = request("x", "y").validate().unwrap();
    assert!(Uuid::parse_str(&sub.session_id).is_ok());
    assert!(Uuid::parse_str(&sub.request_id).is_ok());
  }

  #[test]
  fn code_is_kept_verbatim() {
    let sub = request("  indented()\n", "E").validate().unwrap();
    assert_eq!(sub.code, "  indented()\n");
  }

  #[test]
  fn partial_flag_is_omitted_when_false() {
    let resp = FixResponse {
      success:    true,
      fixed_code: "x = 1".into(),
      concepts:   vec!["Assignment".into()],
      partial:    false,
    };
    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(
      json,
      serde_json::json!({
        "success": true,
        "fixed_code": "x = 1",
        "concepts": ["Assignment"],
      })
    );
  }
}
