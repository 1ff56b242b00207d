//! Tests for `PostgrestStore` against an in-process PostgREST stand-in.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex},
};

use axum::{
  Json, Router,
  extract::{Query, State},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
  routing::get,
};
use fixlearn_core::{
  message::{MessageBody, NewMessage, Role},
  store::SessionStore,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::{Error, PostgrestStore};

type Rows = Arc<Mutex<Vec<Value>>>;

const KEY: &str = "service-key";

fn authorised(headers: &HeaderMap) -> bool {
  headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(KEY)
    && headers.get("authorization").and_then(|v| v.to_str().ok())
      == Some("Bearer service-key")
}

async fn insert(
  State(rows): State<Rows>,
  headers: HeaderMap,
  Json(row): Json<Value>,
) -> impl IntoResponse {
  if !authorised(&headers) {
    return StatusCode::UNAUTHORIZED;
  }
  if row["session_id"] == "violate" {
    return StatusCode::CONFLICT;
  }
  rows.lock().unwrap().push(row);
  StatusCode::CREATED
}

async fn select(
  State(rows): State<Rows>,
  headers: HeaderMap,
  Query(params): Query<HashMap<String, String>>,
) -> axum::response::Response {
  if !authorised(&headers) {
    return StatusCode::UNAUTHORIZED.into_response();
  }
  assert_eq!(params["order"], "created_at.desc");
  let session = params["session_id"].strip_prefix("eq.").unwrap().to_owned();
  let limit: usize = params["limit"].parse().unwrap();

  let mut matching: Vec<Value> = rows
    .lock()
    .unwrap()
    .iter()
    .filter(|r| r["session_id"] == session.as_str())
    .cloned()
    .collect();
  matching.reverse();
  matching.truncate(limit);
  Json(matching).into_response()
}

async fn serve() -> (String, Rows) {
  let rows: Rows = Arc::default();
  let app = Router::new()
    .route("/rest/v1/messages", get(select).post(insert))
    .with_state(rows.clone());
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
  (format!("http://{addr}"), rows)
}

fn message(session: &str, content: &str) -> NewMessage {
  NewMessage {
    session_id: session.to_owned(),
    message:    MessageBody {
      role:    Role::Human,
      content: content.to_owned(),
      data:    Some(json!({ "request_id": "r1" })),
    },
  }
}

#[tokio::test]
async fn append_posts_row_with_message_json() {
  let (url, rows) = serve().await;
  let store = PostgrestStore::new(&url, KEY).unwrap();

  let record = store.append_message(message("s1", "print(x)")).await.unwrap();

  let stored = rows.lock().unwrap().clone();
  assert_eq!(stored.len(), 1);
  assert_eq!(stored[0]["id"], record.id.to_string());
  assert_eq!(stored[0]["session_id"], "s1");
  assert_eq!(stored[0]["message"]["role"], "human");
  assert_eq!(stored[0]["message"]["content"], "print(x)");
}

#[tokio::test]
async fn recent_messages_filters_and_orders() {
  let (url, _rows) = serve().await;
  let store = PostgrestStore::new(&format!("{url}/rest/v1/"), KEY).unwrap();

  for i in 0..3 {
    store.append_message(message("a", &format!("a{i}"))).await.unwrap();
  }
  store.append_message(message("b", "b0")).await.unwrap();

  let listed = store.recent_messages("a", 2).await.unwrap();
  let contents: Vec<_> = listed.iter().map(|r| r.message.content.as_str()).collect();
  assert_eq!(contents, vec!["a1", "a2"]);
  assert!(listed.iter().all(|r| r.session_id == "a"));
}

#[tokio::test]
async fn rejected_insert_is_status_error() {
  let (url, _rows) = serve().await;
  let store = PostgrestStore::new(&url, KEY).unwrap();
  let err = store.append_message(message("violate", "x")).await.unwrap_err();
  assert!(matches!(err, Error::Status { status: 409, .. }), "{err:?}");
}

#[tokio::test]
async fn wrong_key_is_status_error() {
  let (url, _rows) = serve().await;
  let store = PostgrestStore::new(&url, "wrong").unwrap();
  let err = store.recent_messages("a", 10).await.unwrap_err();
  assert!(matches!(err, Error::Status { status: 401, .. }), "{err:?}");
}
