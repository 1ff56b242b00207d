//! OpenAI-compatible chat-completions client.
//!
//! Talks to any provider exposing `POST {base_url}/chat/completions` with a
//! bearer API key (Together AI by default). Implements
//! [`fixlearn_core::model::ModelClient`].

use std::time::Duration;

use fixlearn_core::model::{ModelClient, ModelError};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.together.xyz/v1";
pub const DEFAULT_MODEL: &str = "meta-llama/Llama-3.3-70B-Instruct-Turbo";

/// Connection settings for the model provider.
#[derive(Debug, Clone)]
pub struct ModelConfig {
  pub base_url: String,
  pub api_key:  String,
  pub model:    String,
  pub timeout:  Duration,
}

/// Async client for a chat-completions endpoint.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ChatCompletionsClient {
  client: Client,
  config: ModelConfig,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
  model:       &'a str,
  messages:    [ChatMessage<'a>; 1],
  temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
  role:    &'static str,
  content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
  #[serde(default)]
  choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
  message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
  #[serde(default)]
  content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
  error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
  message: String,
}

// ─── Client ──────────────────────────────────────────────────────────────────

impl ChatCompletionsClient {
  pub fn new(config: ModelConfig) -> Result<Self, reqwest::Error> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!(
      "{}/chat/completions",
      self.config.base_url.trim_end_matches('/')
    )
  }
}

impl ModelClient for ChatCompletionsClient {
  async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
    let request = ChatRequest {
      model:       &self.config.model,
      messages:    [ChatMessage { role: "user", content: prompt }],
      temperature: 0.2,
    };

    let resp = self
      .client
      .post(self.url())
      .bearer_auth(&self.config.api_key)
      .json(&request)
      .send()
      .await
      .map_err(|e| ModelError::Network(e.to_string()))?;

    let status = resp.status();
    let text = resp
      .text()
      .await
      .map_err(|e| ModelError::Network(e.to_string()))?;

    if !status.is_success() {
      return Err(ModelError::Upstream {
        status:  status.as_u16(),
        message: upstream_message(&text),
      });
    }

    let parsed: ChatResponse = serde_json::from_str(&text)
      .map_err(|e| ModelError::MalformedResponse(e.to_string()))?;

    let content = parsed
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message.content)
      .unwrap_or_default();

    if content.trim().is_empty() {
      return Err(ModelError::EmptyCompletion);
    }
    tracing::debug!(chars = content.len(), "received completion");
    Ok(content)
  }
}

/// The provider's own error message if the body carries one, else the
/// leading part of the raw body.
fn upstream_message(body: &str) -> String {
  if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
    return envelope.error.message;
  }
  body.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header},
    routing::post,
  };
  use serde_json::{Value, json};
  use tokio::net::TcpListener;

  async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}/v1")
  }

  fn client(base_url: String) -> ChatCompletionsClient {
    ChatCompletionsClient::new(ModelConfig {
      base_url,
      api_key: "sk-test".into(),
      model: "test-model".into(),
      timeout: Duration::from_secs(5),
    })
    .unwrap()
  }

  #[tokio::test]
  async fn returns_first_choice_content() {
    let app = Router::new().route(
      "/v1/chat/completions",
      post(|headers: HeaderMap, Json(body): Json<Value>| async move {
        let auth = headers.get(header::AUTHORIZATION).unwrap().to_str().unwrap();
        assert_eq!(auth, "Bearer sk-test");
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["messages"][0]["role"], "user");
        let prompt = body["messages"][0]["content"].as_str().unwrap().to_owned();
        Json(json!({
          "choices": [{ "message": { "role": "assistant", "content": format!("echo: {prompt}") } }]
        }))
      }),
    );
    let c = client(serve(app).await);
    assert_eq!(c.complete("hi").await.unwrap(), "echo: hi");
  }

  #[tokio::test]
  async fn error_status_is_upstream_with_provider_message() {
    let app = Router::new().route(
      "/v1/chat/completions",
      post(|| async {
        (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "error": { "message": "invalid api key" } })),
        )
      }),
    );
    let c = client(serve(app).await);
    let err = c.complete("hi").await.unwrap_err();
    assert_eq!(
      err,
      ModelError::Upstream { status: 401, message: "invalid api key".into() }
    );
    assert!(!err.is_transient());
  }

  #[tokio::test]
  async fn unreachable_host_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let c = client(format!("http://{addr}/v1"));
    let err = c.complete("hi").await.unwrap_err();
    assert!(matches!(err, ModelError::Network(_)), "{err:?}");
    assert!(err.is_transient());
  }

  #[tokio::test]
  async fn empty_choices_is_empty_completion() {
    let app = Router::new().route(
      "/v1/chat/completions",
      post(|| async { Json(json!({ "choices": [] })) }),
    );
    let c = client(serve(app).await);
    assert_eq!(c.complete("hi").await.unwrap_err(), ModelError::EmptyCompletion);
  }

  #[tokio::test]
  async fn non_json_success_body_is_malformed() {
    let app = Router::new()
      .route("/v1/chat/completions", post(|| async { "<html>oops</html>" }));
    let c = client(serve(app).await);
    assert!(matches!(
      c.complete("hi").await.unwrap_err(),
      ModelError::MalformedResponse(_)
    ));
  }

  #[test]
  fn upstream_message_truncates_raw_bodies() {
    let body = "x".repeat(500);
    assert_eq!(upstream_message(&body).len(), 200);
  }
}
