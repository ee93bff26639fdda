//! Test helpers for HTTP API tests.
//!
//! Provides a TestApp wrapping an axum-test server over an in-memory
//! database and a temporary content root, plus request helpers.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{HeaderName, AUTHORIZATION};
use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::Value;
use tempfile::TempDir;

use files_manager::{build_services, create_router, AppState, Config, Database, WorkerPool};

/// Header carrying the session token.
pub const TOKEN: HeaderName = HeaderName::from_static("x-token");

/// A running test application.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub workers: WorkerPool,
    pub temp_dir: TempDir,
}

/// Create a test configuration rooted in `temp_dir`.
pub fn create_test_config(temp_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.storage.folder_path = temp_dir
        .path()
        .join("files")
        .to_string_lossy()
        .into_owned();
    config.thumbnails.retry_backoff_ms = 10;
    config
}

/// Create a test app with an in-memory database.
pub async fn create_test_app() -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&temp_dir);

    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let services = build_services(&config, db);

    let router = create_router(Arc::clone(&services.state));
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        state: services.state,
        workers: services.workers,
        temp_dir,
    }
}

/// Basic authorization header value.
pub fn basic(email: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{email}:{password}")))
}

/// POST /users.
pub async fn register(server: &TestServer, email: &str, password: &str) -> TestResponse {
    server
        .post("/users")
        .json(&serde_json::json!({ "email": email, "password": password }))
        .await
}

/// GET /connect and return the token.
pub async fn connect(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .get("/connect")
        .add_header(AUTHORIZATION, basic(email, password))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["token"]
        .as_str()
        .expect("token in response")
        .to_string()
}

/// Register a user and return a fresh token.
pub async fn signup(server: &TestServer, email: &str, password: &str) -> String {
    register(server, email, password)
        .await
        .assert_status(StatusCode::CREATED);
    connect(server, email, password).await
}

/// POST /files with `body`.
pub async fn create_node(server: &TestServer, token: &str, body: Value) -> TestResponse {
    server
        .post("/files")
        .add_header(TOKEN, token.to_string())
        .json(&body)
        .await
}

/// Create a node and return its JSON document.
pub async fn create_node_ok(server: &TestServer, token: &str, body: Value) -> Value {
    let response = create_node(server, token, body).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

/// PNG bytes of a `width` x `height` gradient.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 200])
    });
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("encode png");
    buffer.into_inner()
}

/// Base64 of a PNG.
pub fn png_base64(width: u32, height: u32) -> String {
    STANDARD.encode(png(width, height))
}

/// Poll the rendition endpoint until it answers 200 or time runs out.
pub async fn wait_for_rendition(
    server: &TestServer,
    token: &str,
    id: &str,
    width: u32,
) -> Option<Vec<u8>> {
    for _ in 0..100 {
        let response = server
            .get(&format!("/files/{id}/data"))
            .add_query_param("size", width)
            .add_header(TOKEN, token.to_string())
            .await;
        if response.status_code() == StatusCode::OK {
            return Some(response.as_bytes().to_vec());
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    None
}
