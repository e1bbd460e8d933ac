// Comment Repository - lazy per-post thread listing and validated comment
// creation. Profile joins work exactly as they do for posts.

use super::profiles::ProfileDirectory;
use crate::core::{PostId, UserId};
use crate::error::{AppError, AppResult};
use crate::gateway::{DataGateway, NewCommentRow};
use crate::models::Comment;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CommentRepository {
    gateway: Arc<dyn DataGateway>,
    profiles: Arc<ProfileDirectory>,
}

impl CommentRepository {
    pub fn new(gateway: Arc<dyn DataGateway>, profiles: Arc<ProfileDirectory>) -> Self {
        Self { gateway, profiles }
    }

    /// Comments for one post, oldest first, with the batched author join.
    pub async fn list_comments(&self, post_id: PostId) -> AppResult<Vec<Comment>> {
        let rows = self
            .gateway
            .fetch_comments(post_id)
            .await
            .map_err(|e| AppError::Fetch(format!("failed to load comments: {}", e)))?;

        let mut author_ids: Vec<UserId> = Vec::new();
        for row in &rows {
            if !author_ids.contains(&row.author_id) {
                author_ids.push(row.author_id);
            }
        }
        let profiles = self
            .profiles
            .lookup(&author_ids)
            .await
            .map_err(|e| AppError::Fetch(format!("failed to load commenter profiles: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let author = profiles.get(&row.author_id).cloned();
                Comment {
                    id: row.id,
                    post_id: row.post_id,
                    author_id: row.author_id,
                    body: row.body,
                    created_at: row.created_at,
                    author,
                }
            })
            .collect())
    }

    /// Validate and store a comment. An empty body after trimming is rejected
    /// before any remote call. Server-assigned id and timestamp stay
    /// authoritative; callers re-fetch the thread rather than appending the
    /// returned record locally.
    pub async fn add_comment(
        &self,
        post_id: PostId,
        author: UserId,
        body: &str,
    ) -> AppResult<Comment> {
        let body = body.trim();
        if body.is_empty() {
            return Err(AppError::Validation(
                "comment must not be empty".to_string(),
            ));
        }

        let row = self
            .gateway
            .insert_comment(NewCommentRow {
                post_id,
                author_id: author,
                body: body.to_string(),
            })
            .await
            .map_err(|e| AppError::Create(format!("failed to add comment: {}", e)))?;

        Ok(Comment {
            id: row.id,
            post_id: row.post_id,
            author_id: row.author_id,
            body: row.body,
            created_at: row.created_at,
            author: None,
        })
    }
}
