// Remote Data Gateway - the hosted backend's row contract as a typed trait.
// Repositories are written against this seam; production talks to Postgres,
// tests and demos talk to the in-memory implementation.

pub mod memory;
pub mod postgres;
pub mod rows;

use crate::core::{PostId, UserId};
use crate::error::AppResult;
use async_trait::async_trait;
use std::sync::Arc;

pub use memory::MemoryGateway;
pub use postgres::PostgresGateway;
pub use rows::{CommentRow, LikeRow, NewCommentRow, NewPostRow, PostRow, ProfileRow};

/// Row-oriented operations of the remote backend: ordered reads with
/// equality/membership filters, inserts, and delete-by-filter. Auth and
/// row-level authorization live behind this seam, not in front of it.
#[async_trait]
pub trait DataGateway: Send + Sync + std::fmt::Debug {
    /// All posts, newest first.
    async fn fetch_posts(&self) -> AppResult<Vec<PostRow>>;
    async fn insert_post(&self, row: NewPostRow) -> AppResult<PostRow>;

    /// Like rows for one post.
    async fn fetch_likes(&self, post_id: PostId) -> AppResult<Vec<LikeRow>>;
    /// Idempotent: inserting an existing (post, user) pair is a no-op.
    async fn insert_like(&self, post_id: PostId, user_id: UserId) -> AppResult<()>;
    /// Returns whether a row was actually removed.
    async fn delete_like(&self, post_id: PostId, user_id: UserId) -> AppResult<bool>;

    /// Comments for one post, oldest first.
    async fn fetch_comments(&self, post_id: PostId) -> AppResult<Vec<CommentRow>>;
    async fn count_comments(&self, post_id: PostId) -> AppResult<u64>;
    async fn insert_comment(&self, row: NewCommentRow) -> AppResult<CommentRow>;

    /// Membership query over profile ids; one call per listing, never one
    /// per row. Unknown ids are simply absent from the result.
    async fn fetch_profiles(&self, user_ids: &[UserId]) -> AppResult<Vec<ProfileRow>>;
    async fn update_avatar(&self, user_id: UserId, avatar_url: &str) -> AppResult<()>;
}

// Blanket implementation for Arc<T> so repositories can hold either a
// concrete gateway or a shared trait object.
#[async_trait]
impl<T: DataGateway + ?Sized> DataGateway for Arc<T> {
    async fn fetch_posts(&self) -> AppResult<Vec<PostRow>> {
        (**self).fetch_posts().await
    }

    async fn insert_post(&self, row: NewPostRow) -> AppResult<PostRow> {
        (**self).insert_post(row).await
    }

    async fn fetch_likes(&self, post_id: PostId) -> AppResult<Vec<LikeRow>> {
        (**self).fetch_likes(post_id).await
    }

    async fn insert_like(&self, post_id: PostId, user_id: UserId) -> AppResult<()> {
        (**self).insert_like(post_id, user_id).await
    }

    async fn delete_like(&self, post_id: PostId, user_id: UserId) -> AppResult<bool> {
        (**self).delete_like(post_id, user_id).await
    }

    async fn fetch_comments(&self, post_id: PostId) -> AppResult<Vec<CommentRow>> {
        (**self).fetch_comments(post_id).await
    }

    async fn count_comments(&self, post_id: PostId) -> AppResult<u64> {
        (**self).count_comments(post_id).await
    }

    async fn insert_comment(&self, row: NewCommentRow) -> AppResult<CommentRow> {
        (**self).insert_comment(row).await
    }

    async fn fetch_profiles(&self, user_ids: &[UserId]) -> AppResult<Vec<ProfileRow>> {
        (**self).fetch_profiles(user_ids).await
    }

    async fn update_avatar(&self, user_id: UserId, avatar_url: &str) -> AppResult<()> {
        (**self).update_avatar(user_id, avatar_url).await
    }
}
