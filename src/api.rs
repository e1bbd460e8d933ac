// Feed REST API - a thin facade over the repositories and the upload
// boundary. The viewer comes from the `x-viewer-id` header; mutating
// endpoints without one fail before any gateway call.

use crate::app_state::AppState;
use crate::core::PostId;
use crate::error::{AppError, AppResult};
use crate::models::{Comment, NewPost, Post};
use crate::viewer::ViewerContext;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
    routing::{get, post},
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

pub const VIEWER_HEADER: &str = "x-viewer-id";

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub file_name: String,
    pub content_type: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct LikeToggleResponse {
    pub liked: bool,
    pub likes_count: u64,
}

pub fn create_feed_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{post_id}/like", post(toggle_like))
        .route(
            "/posts/{post_id}/comments",
            get(list_comments).post(add_comment),
        )
        .route("/uploads/avatar", post(upload_avatar))
        .route("/uploads/post-image", post(upload_post_image))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_posts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<ApiResponse<Vec<Post>>>> {
    let viewer = viewer_from_headers(&headers)?;
    let posts = state
        .posts
        .list_posts(viewer.map(|v| v.user_id))
        .await?;
    Ok(Json(ApiResponse::ok(posts)))
}

async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(new_post): Json<NewPost>,
) -> AppResult<Json<ApiResponse<Post>>> {
    let viewer = require_viewer(&headers)?;
    let post = state.posts.create_post(viewer.user_id, new_post).await?;
    Ok(Json(ApiResponse::ok(post)))
}

/// Server-side like toggle: remove the (post, viewer) pair if present,
/// otherwise insert it, then report the recomputed count.
async fn toggle_like(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<PostId>,
) -> AppResult<Json<ApiResponse<LikeToggleResponse>>> {
    let viewer = require_viewer(&headers)?;

    let removed = state
        .gateway
        .delete_like(post_id, viewer.user_id)
        .await
        .map_err(|e| AppError::Create(format!("failed to toggle like: {}", e)))?;
    if !removed {
        state
            .gateway
            .insert_like(post_id, viewer.user_id)
            .await
            .map_err(|e| AppError::Create(format!("failed to toggle like: {}", e)))?;
    }

    let likes = state
        .gateway
        .fetch_likes(post_id)
        .await
        .map_err(|e| AppError::Fetch(format!("failed to load likes: {}", e)))?;
    Ok(Json(ApiResponse::ok(LikeToggleResponse {
        liked: !removed,
        likes_count: likes.len() as u64,
    })))
}

async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<PostId>,
) -> AppResult<Json<ApiResponse<Vec<Comment>>>> {
    let comments = state.comments.list_comments(post_id).await?;
    Ok(Json(ApiResponse::ok(comments)))
}

async fn add_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<PostId>,
    Json(request): Json<AddCommentRequest>,
) -> AppResult<Json<ApiResponse<Comment>>> {
    let viewer = require_viewer(&headers)?;
    let comment = state
        .comments
        .add_comment(post_id, viewer.user_id, &request.body)
        .await?;
    Ok(Json(ApiResponse::ok(comment)))
}

async fn upload_avatar(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<UploadRequest>,
) -> AppResult<Json<ApiResponse<UploadResponse>>> {
    let viewer = require_viewer(&headers)?;
    let bytes = decode_payload(&request.data)?;
    let url = state
        .uploader
        .upload_avatar(
            viewer.user_id,
            &request.file_name,
            &request.content_type,
            &bytes,
        )
        .await?;

    // The new avatar becomes part of the profile projection immediately.
    state.gateway.update_avatar(viewer.user_id, &url).await?;
    state.profiles.invalidate(viewer.user_id);

    Ok(Json(ApiResponse::ok(UploadResponse { url })))
}

async fn upload_post_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<UploadRequest>,
) -> AppResult<Json<ApiResponse<UploadResponse>>> {
    let viewer = require_viewer(&headers)?;
    let bytes = decode_payload(&request.data)?;
    let url = state
        .uploader
        .upload_post_image(
            viewer.user_id,
            &request.file_name,
            &request.content_type,
            &bytes,
        )
        .await?;
    Ok(Json(ApiResponse::ok(UploadResponse { url })))
}

fn decode_payload(data: &str) -> AppResult<Vec<u8>> {
    BASE64
        .decode(data)
        .map_err(|_| AppError::Upload("image payload is not valid base64".to_string()))
}

fn viewer_from_headers(headers: &HeaderMap) -> AppResult<Option<ViewerContext>> {
    match headers.get(VIEWER_HEADER) {
        None => Ok(None),
        Some(value) => {
            let raw = value
                .to_str()
                .map_err(|_| AppError::Validation(format!("invalid {} header", VIEWER_HEADER)))?;
            let id = Uuid::parse_str(raw)
                .map_err(|_| AppError::Validation(format!("invalid {} header", VIEWER_HEADER)))?;
            Ok(Some(ViewerContext::new(id)))
        }
    }
}

fn require_viewer(headers: &HeaderMap) -> AppResult<ViewerContext> {
    viewer_from_headers(headers)?.ok_or_else(|| {
        AppError::AuthRequired("this action requires a signed-in viewer".to_string())
    })
}
