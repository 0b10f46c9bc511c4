//! Integration tests driving the full router against an in-memory store.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use mediaspace::api::AppState;
use mediaspace::config::Config;
use sea_orm::ConnectionTrait;
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "mediaspace-test-boundary";

async fn spawn_app() -> (Arc<AppState>, Router) {
    spawn_app_with(|_| {}).await
}

async fn spawn_app_with(mutate: impl FnOnce(&mut Config)) -> (Arc<AppState>, Router) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // In-memory sqlite is per-connection; a single-connection pool keeps
    // every query on the migrated database.
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config.storage.upload_root = std::env::temp_dir()
        .join(format!(
            "mediaspace-test-{}-{}",
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default(),
            std::process::id()
        ))
        .join("uploads")
        .to_string_lossy()
        .into_owned();
    // Cheap hashing parameters so the auth tests stay fast
    config.auth.argon2_memory_cost_kib = 1024;
    config.auth.argon2_time_cost = 1;
    mutate(&mut config);

    let state = mediaspace::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    let router = mediaspace::api::router(state.clone());
    (state, router)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

struct Part<'a> {
    name: &'a str,
    filename: Option<&'a str>,
    content_type: Option<&'a str>,
    value: &'a [u8],
}

impl<'a> Part<'a> {
    const fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            filename: None,
            content_type: None,
            value: value.as_bytes(),
        }
    }

    const fn file(
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        value: &'a [u8],
    ) -> Self {
        Self {
            name,
            filename: Some(filename),
            content_type: Some(content_type),
            value,
        }
    }
}

fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(filename) = part.filename {
            disposition.push_str(&format!("; filename=\"{filename}\""));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.value);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "Content-Type",
            format!("{}; boundary={BOUNDARY}", mime::MULTIPART_FORM_DATA),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn register_user(app: &Router, email: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/register",
            serde_json::json!({
                "email": email,
                "password": "hunter2hunter2",
                "name": "Test User"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["data"]["id"].as_i64().expect("registered user id")
}

#[tokio::test]
async fn test_register_and_login_flow() {
    let (_state, app) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/register",
            serde_json::json!({
                "email": "ada@example.com",
                "password": "correct-horse",
                "name": "Ada",
                "reason": "archiving"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert_eq!(body["data"]["approved"], true);
    assert_eq!(body["data"]["is_admin"], false);
    assert!(body["data"].get("password_hash").is_none());

    // Same email again: conflict, reported as 400
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/register",
            serde_json::json!({
                "email": "ada@example.com",
                "password": "other",
                "name": "Imposter"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("already registered")
    );

    // Correct password logs in
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/login",
            serde_json::json!({
                "email": "ada@example.com",
                "password": "correct-horse"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "Ada");

    // Wrong password: the password message, never the not-found one
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/login",
            serde_json::json!({
                "email": "ada@example.com",
                "password": "wrong"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("Wrong password"));
    assert!(!error.contains("not registered"));

    // Unknown email gets the distinct not-registered message
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/login",
            serde_json::json!({
                "email": "nobody@example.com",
                "password": "whatever"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("not registered"));
}

#[tokio::test]
async fn test_admin_flag_is_seeded_from_config() {
    let (_state, app) = spawn_app_with(|config| {
        config.auth.admin_email = Some("root@example.com".to_string());
    })
    .await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/register",
            serde_json::json!({
                "email": "root@example.com",
                "password": "s3cret-s3cret",
                "name": "Root"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["is_admin"], true);

    // Everyone else stays a regular user
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/register",
            serde_json::json!({
                "email": "guest@example.com",
                "password": "s3cret-s3cret",
                "name": "Guest"
            }),
        ))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["data"]["is_admin"], false);
}

#[tokio::test]
async fn test_current_user_is_a_stub() {
    let (_state, app) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/user")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert!(body["data"]["user"].is_null());
}

#[tokio::test]
async fn test_upload_rejects_declared_type_mismatch() {
    let (_state, app) = spawn_app().await;
    let user_id = register_user(&app, "uploader@example.com").await;

    let user_id_text = user_id.to_string();
    let response = app
        .clone()
        .oneshot(multipart_request(
            "/api/upload",
            &[
                Part::text("user_id", &user_id_text),
                Part::text("title", "Not actually a video"),
                Part::text("type", "video"),
                Part::file("file", "photo.png", "image/png", b"\x89PNG fake"),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("video"));
    assert!(error.contains("image"));
}

#[tokio::test]
async fn test_upload_requires_a_file_part() {
    let (_state, app) = spawn_app().await;
    let user_id = register_user(&app, "fileless@example.com").await;

    let user_id_text = user_id.to_string();
    let response = app
        .clone()
        .oneshot(multipart_request(
            "/api/upload",
            &[
                Part::text("user_id", &user_id_text),
                Part::text("title", "Nothing attached"),
                Part::text("type", "image"),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("No file"));
}

#[tokio::test]
async fn test_upload_and_catalog_flow() {
    let (state, app) = spawn_app().await;
    let user_id = register_user(&app, "curator@example.com").await;

    let user_id_text = user_id.to_string();
    let response = app
        .clone()
        .oneshot(multipart_request(
            "/api/upload",
            &[
                Part::text("user_id", &user_id_text),
                Part::text("title", "Sunset"),
                Part::text("type", "image"),
                Part::file("file", "sunset.jpg", "image/jpeg", b"fake jpeg bytes"),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let media = &body["data"];
    assert_eq!(media["title"], "Sunset");
    assert_eq!(media["type"], "image");
    // Omitted description falls back to the placeholder
    assert_eq!(media["description"], "No description");
    let file_path = media["file_path"].as_str().unwrap();
    assert!(file_path.starts_with("uploads/images/file-"));
    assert!(file_path.ends_with(".jpg"));
    let media_id = media["id"].as_i64().unwrap();

    // Listing returns it, newest first
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/media")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let listed = body["data"].as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"].as_i64().unwrap(), media_id);

    // Type filter excludes it
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/media?type=video")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    // Fetch by id, then a missing id
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/media/{media_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/media/99999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The placed file is really on disk under the storage root
    let root = std::path::PathBuf::from(&state.config().storage.upload_root);
    let on_disk = root.join(file_path.strip_prefix("uploads/").unwrap());
    assert!(on_disk.is_file());

    tokio::fs::remove_dir_all(root.parent().unwrap()).await.ok();
}

#[tokio::test]
async fn test_stats_counters_accumulate_per_page() {
    let (_state, app) = spawn_app().await;

    // Missing page is a client error
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/update-stats", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/update-stats",
                serde_json::json!({ "page": "self-media" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Visits to other pages never leak into the dashboard aggregate
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/update-stats",
            serde_json::json!({ "page": "index" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["totalVisits"].as_i64().unwrap(), 3);
    let pages = body["data"]["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0]["total_visits"].as_i64().unwrap(), 3);
}

#[tokio::test]
async fn test_stats_degrade_to_zeros_when_fail_open() {
    let (state, app) = spawn_app().await;

    state
        .store()
        .conn
        .execute_unprepared("DROP TABLE stats")
        .await
        .expect("failed to drop stats table");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["totalVisits"].as_i64().unwrap(), 0);
    assert!(body["data"]["pages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_stats_fail_closed_when_configured() {
    let (state, app) = spawn_app_with(|config| {
        config.stats.fail_open = false;
    })
    .await;

    state
        .store()
        .conn
        .execute_unprepared("DROP TABLE stats")
        .await
        .expect("failed to drop stats table");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_new_users_newest_first() {
    let (_state, app) = spawn_app().await;

    register_user(&app, "first@example.com").await;
    register_user(&app, "second@example.com").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/new-users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let users = body["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["email"], "second@example.com");
    assert_eq!(users[1]["email"], "first@example.com");
    // Hashes never serialize
    for user in users {
        assert!(user.get("password_hash").is_none());
    }
}
