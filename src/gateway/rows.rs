// Row shapes for the four tables the gateway exposes. Repositories
// deserialize and validate these at their boundary; nothing downstream sees
// an untyped row.

use crate::core::{CommentId, PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostRow {
    pub id: PostId,
    pub author_id: UserId,
    pub title: String,
    pub body: String,
    /// Stored verbatim; parsed into `PostCategory` by the post repository.
    pub post_type: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for `posts`. Id and timestamp are assigned by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPostRow {
    pub author_id: UserId,
    pub title: String,
    pub body: String,
    pub post_type: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LikeRow {
    pub post_id: PostId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentRow {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for `post_comments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCommentRow {
    pub post_id: PostId,
    pub author_id: UserId,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: UserId,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}
