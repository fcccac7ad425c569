#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};

use editsync::auth::{SessionSigner, StaticCredentials};
use editsync::completion::mock::{MockCompleter, MockReply};
use editsync::dispatcher::Dispatcher;
use editsync::history::sqlite::SqliteHistory;
use editsync::prompts::PromptTable;
use editsync::server::{self, AppState};

pub const SECRET: &str = "test-secret";
const BOUNDARY: &str = "editsync-test-boundary";

/// App state wired to a scripted completer and the default login pair.
pub fn state(replies: Vec<MockReply>) -> (AppState, Arc<MockCompleter>) {
    let mock = Arc::new(MockCompleter::new(replies));
    let dispatcher = Dispatcher::new(PromptTable::default(), mock.clone());
    let state = AppState::new(
        dispatcher,
        Arc::new(StaticCredentials::default()),
        SessionSigner::new(SECRET),
    );
    (state, mock)
}

/// Same as [`state`] plus an in-memory history store.
pub fn state_with_history(replies: Vec<MockReply>) -> (AppState, Arc<MockCompleter>, Arc<SqliteHistory>) {
    let (state, mock) = state(replies);
    let history = Arc::new(SqliteHistory::in_memory().unwrap());
    (state.with_history(history.clone()), mock, history)
}

pub fn app(state: AppState) -> Router {
    server::router(state)
}

/// A multipart/form-data body with plain text fields.
pub fn multipart_body(fields: &[(&str, &str)]) -> (String, Vec<u8>) {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    (
        format!("multipart/form-data; boundary={BOUNDARY}"),
        body.into_bytes(),
    )
}

pub fn ai_request(fields: &[(&str, &str)]) -> Request<Body> {
    let (content_type, body) = multipart_body(fields);
    Request::builder()
        .method("POST")
        .uri("/api/ai")
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap()
}

pub fn login_request(email: &str, password: &str) -> Request<Body> {
    let body = format!(
        "email={}&password={}",
        email.replace('@', "%40"),
        password
    );
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

/// The `name=value` part of the response's Set-Cookie header.
pub fn set_cookie(resp: &Response<Body>) -> String {
    resp.headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

pub async fn json_body(resp: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
