//! Thumbnail Pipeline Tests
//!
//! Integration tests for image uploads flowing through the worker pool.

mod common;

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;

use common::{create_node_ok, create_test_app, png_base64, signup, wait_for_rendition, TOKEN};
use files_manager::{derived_ref, ContentStore, FileContentStore, SourceImage, ThumbnailJob};

#[tokio::test]
async fn test_image_upload_produces_renditions() {
    let app = create_test_app().await;
    let token = signup(&app.server, "a@x.com", "pw1").await;

    let image = create_node_ok(
        &app.server,
        &token,
        json!({ "name": "photo.png", "type": "image", "data": png_base64(1000, 500) }),
    )
    .await;
    let id = image["id"].as_str().unwrap();

    for (width, height) in [(500, 250), (250, 125), (100, 50)] {
        let bytes = wait_for_rendition(&app.server, &token, id, width)
            .await
            .unwrap_or_else(|| panic!("rendition {width} was not generated"));
        let rendition = SourceImage::decode(&bytes).unwrap();
        assert_eq!((rendition.width(), rendition.height()), (width, height));
    }
}

#[tokio::test]
async fn test_renditions_follow_visibility() {
    let app = create_test_app().await;
    let token = signup(&app.server, "a@x.com", "pw1").await;
    let other = signup(&app.server, "b@x.com", "pw2").await;

    let image = create_node_ok(
        &app.server,
        &token,
        json!({ "name": "photo.png", "type": "image", "data": png_base64(300, 300) }),
    )
    .await;
    let id = image["id"].as_str().unwrap();
    assert!(wait_for_rendition(&app.server, &token, id, 100).await.is_some());

    app.server
        .get(&format!("/files/{id}/data"))
        .add_query_param("size", 100)
        .add_header(TOKEN, other.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    app.server
        .put(&format!("/files/{id}/publish"))
        .add_header(TOKEN, token)
        .await
        .assert_status_ok();

    let response = app
        .server
        .get(&format!("/files/{id}/data"))
        .add_query_param("size", 100)
        .add_header(TOKEN, other)
        .await;
    response.assert_status_ok();
    assert_eq!(response.header(CONTENT_TYPE), "image/png");
}

#[tokio::test]
async fn test_undecodable_image_gets_no_renditions() {
    let app = create_test_app().await;
    let token = signup(&app.server, "a@x.com", "pw1").await;

    let image = create_node_ok(
        &app.server,
        &token,
        json!({ "name": "broken.png", "type": "image", "data": STANDARD.encode("not an image") }),
    )
    .await;
    let id = image["id"].as_str().unwrap();

    // The upload itself succeeds and the original stays readable.
    app.server
        .get(&format!("/files/{id}/data"))
        .add_header(TOKEN, token.clone())
        .await
        .assert_status_ok();

    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    app.server
        .get(&format!("/files/{id}/data"))
        .add_query_param("size", 250)
        .add_header(TOKEN, token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rerun_job_overwrites_renditions() {
    let app = create_test_app().await;
    let token = signup(&app.server, "a@x.com", "pw1").await;
    let image = create_node_ok(
        &app.server,
        &token,
        json!({ "name": "photo.png", "type": "image", "data": png_base64(600, 400) }),
    )
    .await;
    let id = image["id"].as_str().unwrap();
    let user_id = image["userId"].as_str().unwrap();
    let content_ref = image["contentRef"].as_str().unwrap();
    let first = wait_for_rendition(&app.server, &token, id, 500).await.unwrap();

    app.state
        .thumbnails
        .enqueue(ThumbnailJob::new(id, user_id))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;

    let store = FileContentStore::new(app.temp_dir.path().join("files"));
    let stored = store
        .read(&derived_ref(content_ref, 500))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, first);
}
