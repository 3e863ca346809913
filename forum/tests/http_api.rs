use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use forum::config::AppConfig;
use forum::models::Profile;
use forum::routes;
use forum::storage::MemoryStore;
use forum::AppState;

async fn app() -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    let state = Arc::new(AppState::new(Arc::new(store.clone()), AppConfig::default()));
    state.forum().seed_categories().await.unwrap();
    (routes::router(state), store)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health_reports_ok() {
    let (app, _) = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database_connection"], true);
}

#[tokio::test]
async fn test_categories_are_seeded_and_sorted() {
    let (app, _) = app().await;
    let (status, body) = send(&app, Method::GET, "/api/forums/categories", None).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 8);
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[tokio::test]
async fn test_reply_errors_map_to_status_codes() {
    let (app, _) = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/forums/replies",
        Some(json!({ "threadId": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 400);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/forums/replies",
        Some(json!({
            "threadId": Uuid::new_v4(),
            "authorUserId": Uuid::new_v4(),
            "authorRole": "researcher",
            "body": "hello"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Not JSON at all
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/forums/replies")
                .body(Body::from("threadId=1"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_thread_reply_vote_round_trip() {
    let (app, store) = app().await;
    let researcher = Uuid::new_v4();
    store
        .put_profile(Profile::researcher(researcher, Some(vec!["neurology".into()]), None))
        .await;

    let (_, categories) = send(&app, Method::GET, "/api/forums/categories", None).await;
    let category_id = categories["categories"][0]["id"].as_str().unwrap().to_string();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/forums/threads",
        Some(json!({
            "categoryId": category_id,
            "authorUserId": Uuid::new_v4(),
            "authorRole": "patient",
            "title": "Migraine after trial drug",
            "body": "Is this expected?"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["ok"], true);
    assert_eq!(created["thread"]["replyCount"], 0);
    let thread_id = created["thread"]["id"].as_str().unwrap().to_string();

    let (status, reply) = send(
        &app,
        Method::POST,
        "/api/forums/replies",
        Some(json!({
            "threadId": thread_id,
            "authorUserId": researcher,
            "authorRole": "researcher",
            "body": "It is a known side effect."
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["reply"]["specialties"], json!(["neurology"]));
    assert_eq!(reply["reply"]["voteScore"], 0);
    assert_eq!(reply["reply"]["children"], json!([]));
    let reply_id = reply["reply"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/forums/replies",
        Some(json!({
            "threadId": thread_id,
            "authorUserId": Uuid::new_v4(),
            "authorRole": "patient",
            "body": "Same here"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], 403);

    let voter = Uuid::new_v4();
    let vote_uri = format!("/api/forums/replies/{}/vote", reply_id);
    let (status, voted) = send(
        &app,
        Method::POST,
        &vote_uri,
        Some(json!({ "userId": voter, "voteType": "upvote" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(voted, json!({ "ok": true, "voteScore": 1 }));

    let (status, _) = send(
        &app,
        Method::POST,
        &vote_uri,
        Some(json!({ "userId": voter, "voteType": "meh" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, detail) = send(
        &app,
        Method::GET,
        &format!("/api/forums/threads/{}", thread_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["thread"]["voteScore"], 0);
    assert_eq!(detail["replies"][0]["id"], reply_id.as_str());
    assert_eq!(detail["replies"][0]["parentReplyId"], Value::Null);
    assert_eq!(detail["replies"][0]["voteScore"], 1);
    assert_eq!(detail["replies"][0]["upvotes"], json!([voter]));

    let (status, listing) = send(
        &app,
        Method::GET,
        &format!("/api/forums/threads?categoryId={}", category_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["threads"][0]["replyCount"], 1);
}
