//! File handlers.

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};

use crate::file::NodeType;
use crate::thumbnail::ThumbnailJob;
use crate::web::dto::{parse_lenient, ContentQuery, CreateFileRequest, FileResponse, ListFilesQuery};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::{OptionalTokenUser, TokenUser};

/// POST /files - Create a folder or upload a file.
///
/// Image uploads queue a thumbnail job once the node is stored.
pub async fn create_file(
    State(state): State<Arc<AppState>>,
    TokenUser { user, .. }: TokenUser,
    body: Bytes,
) -> Result<(StatusCode, Json<FileResponse>), ApiError> {
    let req: CreateFileRequest = parse_lenient(&body);

    let node = state.registry.create_node(&user.id, req.into_draft()).await?;

    if node.node_type == NodeType::Image {
        let job = ThumbnailJob::new(&node.id, &user.id);
        if let Err(e) = state.thumbnails.try_enqueue(job) {
            tracing::error!(file_id = %node.id, "Failed to enqueue thumbnail job: {}", e);
        }
    }

    Ok((StatusCode::CREATED, Json(FileResponse::created(node))))
}

/// GET /files/:id - A node the caller owns or that is public.
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    TokenUser { user, .. }: TokenUser,
    Path(id): Path<String>,
) -> Result<Json<FileResponse>, ApiError> {
    let node = state.registry.get_node(&id, Some(&user.id)).await?;
    Ok(Json(node.into()))
}

/// GET /files?parentId&page - One page of the caller's nodes.
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    TokenUser { user, .. }: TokenUser,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<Vec<FileResponse>>, ApiError> {
    let nodes = state
        .registry
        .list_children(&user.id, query.parent(), query.page())
        .await?;

    Ok(Json(nodes.into_iter().map(FileResponse::from).collect()))
}

/// PUT /files/:id/publish
pub async fn publish_file(
    State(state): State<Arc<AppState>>,
    TokenUser { user, .. }: TokenUser,
    Path(id): Path<String>,
) -> Result<Json<FileResponse>, ApiError> {
    let node = state.registry.set_visibility(&id, &user.id, true).await?;
    Ok(Json(node.into()))
}

/// PUT /files/:id/unpublish
pub async fn unpublish_file(
    State(state): State<Arc<AppState>>,
    TokenUser { user, .. }: TokenUser,
    Path(id): Path<String>,
) -> Result<Json<FileResponse>, ApiError> {
    let node = state.registry.set_visibility(&id, &user.id, false).await?;
    Ok(Json(node.into()))
}

/// GET /files/:id/data?size - Raw content, or a rendition when `size` is set.
///
/// The token is optional; public nodes are served to anyone.
pub async fn get_file_data(
    State(state): State<Arc<AppState>>,
    caller: OptionalTokenUser,
    Path(id): Path<String>,
    Query(query): Query<ContentQuery>,
) -> Result<Response<Body>, ApiError> {
    let width = match query.size.as_deref() {
        None => None,
        Some(size) => Some(size.parse::<u32>().map_err(|_| ApiError::not_found())?),
    };

    let (node, content) = state
        .registry
        .read_content(&id, caller.user_id(), width)
        .await?;

    let content_type = mime_guess::from_path(&node.name)
        .first_or_octet_stream()
        .to_string();

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, content.len())
        .body(Body::from(content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal()
        })
}
