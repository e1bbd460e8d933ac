// Domain models exposed to the view layer. Rows coming off the gateway are
// converted into these at the repository boundary; counts and the viewer's
// like state are derived there, never read back from a client cache.

use crate::core::{CommentId, PostCategory, PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only profile projection joined onto posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// A feed post with its derived interaction state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub title: String,
    pub body: String,
    pub category: PostCategory,
    /// Ordered, case-sensitive as stored; filters match case-insensitively.
    pub tags: Vec<String>,
    /// Ordered image list; the first element is mirrored into `image_url`.
    pub image_urls: Vec<String>,
    /// Legacy single-image field kept for older readers.
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub likes_count: u64,
    pub comments_count: u64,
    pub viewer_has_liked: bool,
    pub author: Option<AuthorProfile>,
}

/// A comment on a post, loaded lazily per thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub author: Option<AuthorProfile>,
}

/// Creation-form input for a new post. `tags_input` is the raw
/// comma-separated string; it is parsed at the repository boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub category: PostCategory,
    #[serde(default)]
    pub tags_input: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
}
