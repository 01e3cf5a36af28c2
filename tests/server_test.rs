use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use jotpad::server::{create_router, AppState};
use jotpad::{ServerConfig, SqliteNoteStore};
use serde_json::{json, Value};
use tower::ServiceExt;

const HELLO_DOC: &str =
    r#"{"type":"doc","content":[{"type":"paragraph","content":[{"type":"text","text":"Hello"}]}]}"#;

struct TestApp {
    router: Router,
    alice: String,
    bob: String,
}

fn setup() -> TestApp {
    let store = SqliteNoteStore::open_in_memory().unwrap();
    let alice = store.create_user("Alice", "alice@example.com").unwrap();
    let bob = store.create_user("Bob", "bob@example.com").unwrap();
    let alice_session = store.create_session(&alice.id, Duration::days(1)).unwrap();
    let bob_session = store.create_session(&bob.id, Duration::days(1)).unwrap();

    let config = ServerConfig {
        public_base_url: "https://notes.example.com".to_string(),
        ..ServerConfig::default()
    };

    TestApp {
        router: create_router(AppState::new(store, config)),
        alice: alice_session.token,
        bob: bob_session.token,
    }
}

async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<String>,
) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn create_note(app: &TestApp, token: &str, title: &str) -> Value {
    let body = json!({ "title": title, "content_json": HELLO_DOC }).to_string();
    let (status, body) = send(app, Method::POST, "/api/notes", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    serde_json::from_str(&body).unwrap()
}

fn error_message(body: &str) -> String {
    let value: Value = serde_json::from_str(body).unwrap();
    value["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();
    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["status"], "ok");
}

#[tokio::test]
async fn test_requires_bearer_token() {
    let app = setup();

    let (status, body) = send(&app, Method::GET, "/api/notes", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&body), "Unauthorized");

    let (status, _) = send(&app, Method::GET, "/api/notes", Some("bogus"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_note_crud() {
    let app = setup();
    let note = create_note(&app, &app.alice, "First").await;
    let id = note["id"].as_str().unwrap();
    assert_eq!(note["is_public"], false);
    assert!(note["public_url"].is_null());

    let uri = format!("/api/notes/{}", id);
    let (status, body) = send(&app, Method::GET, &uri, Some(&app.alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(fetched["title"], "First");

    let update = json!({ "title": "Renamed", "content_json": "{}" }).to_string();
    let (status, body) = send(&app, Method::PUT, &uri, Some(&app.alice), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    let updated: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(updated["title"], "Renamed");
    assert_eq!(updated["content_json"], "{}");

    let (status, body) = send(&app, Method::GET, "/api/notes", Some(&app.alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let list: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&app.alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &uri, Some(&app.alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), "Note not found");
}

#[tokio::test]
async fn test_create_rejects_invalid_content() {
    let app = setup();

    let body = json!({ "title": "Bad", "content_json": "not json" }).to_string();
    let (status, body) = send(&app, Method::POST, "/api/notes", Some(&app.alice), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Content is not valid JSON");

    let body = json!({ "title": "", "content_json": "{}" }).to_string();
    let (status, body) = send(&app, Method::POST, "/api/notes", Some(&app.alice), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Title is required");
}

#[tokio::test]
async fn test_notes_are_owner_scoped() {
    let app = setup();
    let note = create_note(&app, &app.alice, "Alice only").await;
    let uri = format!("/api/notes/{}", note["id"].as_str().unwrap());

    let (status, _) = send(&app, Method::GET, &uri, Some(&app.bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&app.bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, "/api/notes", Some(&app.bob), None).await;
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn test_note_html() {
    let app = setup();
    let note = create_note(&app, &app.alice, "Html").await;
    let uri = format!("/api/notes/{}/html", note["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::GET, &uri, Some(&app.alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"<div class="note-content"><p><span>Hello</span></p></div>"#
    );
}

#[tokio::test]
async fn test_share_error_bodies() {
    let app = setup();
    let note = create_note(&app, &app.alice, "Share me").await;
    let uri = format!("/api/notes/{}/share", note["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::POST, &uri, None, Some(r#"{"public":true}"#.into())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&body), "Unauthorized");

    let (status, body) = send(
        &app,
        Method::POST,
        &uri,
        Some(&app.bob),
        Some(r#"{"public":true}"#.into()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), "Note not found");

    let (status, body) = send(&app, Method::POST, &uri, Some(&app.alice), Some("nope".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Invalid request body");

    let (status, body) = send(
        &app,
        Method::POST,
        &uri,
        Some(&app.alice),
        Some(r#"{"public":"yes"}"#.into()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Missing 'public' field");
}

#[tokio::test]
async fn test_public_page_follows_sharing() {
    let app = setup();
    let note = create_note(&app, &app.alice, "Trip <plans>").await;
    let share_uri = format!("/api/notes/{}/share", note["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        Method::POST,
        &share_uri,
        Some(&app.alice),
        Some(r#"{"public":true}"#.into()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let shared: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(shared["is_public"], true);
    let slug = shared["public_slug"].as_str().unwrap().to_string();
    assert_eq!(
        shared["public_url"],
        format!("https://notes.example.com/p/{}", slug)
    );

    let page_uri = format!("/p/{}", slug);
    let (status, page) = send(&app, Method::GET, &page_uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("<h1>Trip &lt;plans&gt;</h1>"));
    assert!(page.contains("<span>Hello</span>"));

    let (status, body) = send(
        &app,
        Method::POST,
        &share_uri,
        Some(&app.alice),
        Some(r#"{"public":false}"#.into()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let private: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(private["is_public"], false);
    assert!(private["public_slug"].is_null());
    assert!(private["public_url"].is_null());

    let (status, page) = send(&app, Method::GET, &page_uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(page.contains("Note not found"));
}

#[tokio::test]
async fn test_public_page_rejects_malformed_slug() {
    let app = setup();
    let (status, _) = send(&app, Method::GET, "/p/not-a-slug!", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
