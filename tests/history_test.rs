mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use common::{ai_request, app, json_body, login_request, set_cookie, state, state_with_history};
use editsync::completion::mock::MockReply;
use editsync::history::sqlite::SqliteHistory;
use editsync::history::{History, NewEntry};

fn entry<'a>(user: &'a str, text: &'a str) -> NewEntry<'a> {
    NewEntry {
        user,
        operation: "Grammar Checker",
        text,
        result: "fixed",
    }
}

// ── Store ─────────────────────────────────────────────────────────

#[tokio::test]
async fn recent_is_newest_first() {
    let history = SqliteHistory::in_memory().unwrap();
    history.record(entry("a@example.com", "first")).await.unwrap();
    history.record(entry("a@example.com", "second")).await.unwrap();

    let recent = history.recent("a@example.com", 10).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].text, "second");
    assert_eq!(recent[1].text, "first");
    assert_eq!(recent[0].operation, "Grammar Checker");
    assert!(!recent[0].timestamp.is_empty());
}

#[tokio::test]
async fn recent_respects_limit() {
    let history = SqliteHistory::in_memory().unwrap();
    for i in 0..5 {
        history
            .record(entry("a@example.com", &format!("text {i}")))
            .await
            .unwrap();
    }

    let recent = history.recent("a@example.com", 2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].text, "text 4");
    assert_eq!(recent[1].text, "text 3");
}

#[tokio::test]
async fn oversized_limit_returns_everything() {
    let history = SqliteHistory::in_memory().unwrap();
    for i in 0..3 {
        history
            .record(entry("a@example.com", &format!("text {i}")))
            .await
            .unwrap();
    }

    let recent = history.recent("a@example.com", usize::MAX).await.unwrap();
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0].text, "text 2");
}

#[tokio::test]
async fn users_are_isolated() {
    let history = SqliteHistory::in_memory().unwrap();
    history.record(entry("a@example.com", "mine")).await.unwrap();
    history.record(entry("b@example.com", "theirs")).await.unwrap();

    let recent = history.recent("a@example.com", 10).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].text, "mine");
}

#[tokio::test]
async fn clear_only_touches_one_user() {
    let history = SqliteHistory::in_memory().unwrap();
    history.record(entry("a@example.com", "mine")).await.unwrap();
    history.record(entry("b@example.com", "theirs")).await.unwrap();

    history.clear("a@example.com").await.unwrap();

    assert!(history.recent("a@example.com", 10).await.unwrap().is_empty());
    assert_eq!(history.recent("b@example.com", 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn persists_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history-test.db");
    let path_str = path.to_str().unwrap();

    {
        let history = SqliteHistory::new(path_str).unwrap();
        history.record(entry("a@example.com", "kept")).await.unwrap();
    }

    let history = SqliteHistory::new(path_str).unwrap();
    let recent = history.recent("a@example.com", 10).await.unwrap();
    assert_eq!(recent[0].text, "kept");
}

// ── HTTP ──────────────────────────────────────────────────────────

fn history_request(cookie: Option<&str>, uri: &str) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn signed_in_requests_are_recorded() {
    let (state, _, _) = state_with_history(vec![
        MockReply::Text("The cat sat.".to_string()),
        MockReply::Fail("down".to_string()),
    ]);
    let router = app(state);

    let resp = router
        .clone()
        .oneshot(login_request("test@editsync.com", "1234"))
        .await
        .unwrap();
    let cookie = set_cookie(&resp);

    for text in ["teh cat sat", "second try"] {
        let mut req = ai_request(&[("operation", "Grammar Checker"), ("text", text)]);
        req.headers_mut()
            .insert(header::COOKIE, cookie.parse().unwrap());
        let resp = router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = router
        .oneshot(history_request(Some(&cookie), "/api/history"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["text"], "second try");
    assert_eq!(entries[0]["result"], "Error processing request");
    assert_eq!(entries[1]["text"], "teh cat sat");
    assert_eq!(entries[1]["result"], "The cat sat.");
}

#[tokio::test]
async fn guest_requests_are_not_recorded() {
    let (state, _, history) = state_with_history(vec![MockReply::Text("ok".to_string())]);
    let resp = app(state)
        .oneshot(ai_request(&[("operation", "AI Chatbot"), ("text", "hi")]))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    assert!(history.recent("test@editsync.com", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn rejected_requests_are_not_recorded() {
    let (state, _, history) = state_with_history(vec![MockReply::Text("ok".to_string())]);
    let router = app(state);
    let resp = router
        .clone()
        .oneshot(login_request("test@editsync.com", "1234"))
        .await
        .unwrap();
    let cookie = set_cookie(&resp);

    let mut req = ai_request(&[("operation", "Bogus"), ("text", "hi")]);
    req.headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert!(history.recent("test@editsync.com", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn history_requires_session() {
    let (state, _, _) = state_with_history(vec![]);
    let resp = app(state)
        .oneshot(history_request(None, "/api/history"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn history_limit_and_clear() {
    let (state, _, history) = state_with_history(vec![]);
    for i in 0..3 {
        history
            .record(entry("test@editsync.com", &format!("text {i}")))
            .await
            .unwrap();
    }
    let router = app(state);
    let resp = router
        .clone()
        .oneshot(login_request("test@editsync.com", "1234"))
        .await
        .unwrap();
    let cookie = set_cookie(&resp);

    let resp = router
        .clone()
        .oneshot(history_request(Some(&cookie), "/api/history?limit=1"))
        .await
        .unwrap();
    let body = json_body(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["text"], "text 2");

    let req = Request::builder()
        .method("DELETE")
        .uri("/api/history")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    assert!(history.recent("test@editsync.com", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn without_store_history_is_empty() {
    let (state, _) = state(vec![]);
    let router = app(state);
    let resp = router
        .clone()
        .oneshot(login_request("test@editsync.com", "1234"))
        .await
        .unwrap();
    let cookie = set_cookie(&resp);

    let resp = router
        .oneshot(history_request(Some(&cookie), "/api/history"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, serde_json::json!([]));
}
