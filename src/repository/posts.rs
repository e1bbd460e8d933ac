// Post Repository - feed listing with derived counts and viewer state, and
// validated post creation. Failures are translated into the user-facing
// taxonomy here; callers keep their prior state on a failed read.

use super::profiles::ProfileDirectory;
use crate::core::{PostCategory, PostId, UserId};
use crate::error::{AppError, AppResult};
use crate::gateway::{DataGateway, LikeRow, NewPostRow, PostRow};
use crate::models::{AuthorProfile, NewPost, Post};
use futures::future::try_join_all;
use std::sync::Arc;

/// Fixed cap on images per post.
pub const MAX_POST_IMAGES: usize = 3;

/// Tags come in as one comma-separated field: split, trim, drop empties,
/// preserve order. Duplicates are kept as typed.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone)]
pub struct PostRepository {
    gateway: Arc<dyn DataGateway>,
    profiles: Arc<ProfileDirectory>,
}

impl PostRepository {
    pub fn new(gateway: Arc<dyn DataGateway>, profiles: Arc<ProfileDirectory>) -> Self {
        Self { gateway, profiles }
    }

    /// Fetch the whole feed, newest first. One batched profile lookup across
    /// the distinct author ids, then like rows and comment counts resolved
    /// concurrently per post. Any failure, including the profile join, fails
    /// the listing as a whole; partial joins are never returned.
    pub async fn list_posts(&self, viewer: Option<UserId>) -> AppResult<Vec<Post>> {
        let rows = self
            .gateway
            .fetch_posts()
            .await
            .map_err(|e| AppError::Fetch(format!("failed to load posts: {}", e)))?;

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
            .map_err(|e| AppError::Fetch(format!("failed to load author profiles: {}", e)))?;

        let posts = try_join_all(rows.into_iter().map(|row| {
            let gateway = self.gateway.clone();
            let author = profiles.get(&row.author_id).cloned();
            async move {
                let (likes, comments_count) = futures::try_join!(
                    gateway.fetch_likes(row.id),
                    gateway.count_comments(row.id)
                )
                .map_err(|e| {
                    AppError::Fetch(format!("failed to load interactions for post: {}", e))
                })?;
                build_post(row, likes, comments_count, viewer, author)
            }
        }))
        .await?;

        Ok(posts)
    }

    /// Validate and create a post. Rejected locally, before any remote call,
    /// when title or body trims to empty or the image list exceeds the cap.
    /// Creation is not optimistic; callers refresh the feed after success.
    pub async fn create_post(&self, author: UserId, new_post: NewPost) -> AppResult<Post> {
        let title = new_post.title.trim();
        let body = new_post.body.trim();
        if title.is_empty() || body.is_empty() {
            return Err(AppError::Validation(
                "title and body must not be empty".to_string(),
            ));
        }
        if new_post.image_urls.len() > MAX_POST_IMAGES {
            return Err(AppError::Validation(format!(
                "a post can carry at most {} images",
                MAX_POST_IMAGES
            )));
        }

        let row = NewPostRow {
            author_id: author,
            title: title.to_string(),
            body: body.to_string(),
            post_type: new_post.category.as_str().to_string(),
            tags: parse_tags(&new_post.tags_input),
            // First image mirrored into the legacy single-image field.
            image_url: new_post.image_urls.first().cloned(),
            image_urls: new_post.image_urls,
        };

        let stored = self
            .gateway
            .insert_post(row)
            .await
            .map_err(|e| AppError::Create(format!("failed to create post: {}", e)))?;

        // The joined view comes from the follow-up feed refresh.
        build_post(stored, Vec::new(), 0, None, None)
    }

    pub async fn like(&self, post_id: PostId, user_id: UserId) -> AppResult<()> {
        self.gateway
            .insert_like(post_id, user_id)
            .await
            .map_err(|e| AppError::Create(format!("failed to record like: {}", e)))
    }

    pub async fn unlike(&self, post_id: PostId, user_id: UserId) -> AppResult<()> {
        self.gateway
            .delete_like(post_id, user_id)
            .await
            .map(|_| ())
            .map_err(|e| AppError::Create(format!("failed to remove like: {}", e)))
    }
}

fn build_post(
    row: PostRow,
    likes: Vec<LikeRow>,
    comments_count: u64,
    viewer: Option<UserId>,
    author: Option<AuthorProfile>,
) -> AppResult<Post> {
    let category: PostCategory = row
        .post_type
        .parse()
        .map_err(|_| AppError::Fetch(format!("post {} has invalid category", row.id)))?;
    let viewer_has_liked = viewer
        .map(|v| likes.iter().any(|l| l.user_id == v))
        .unwrap_or(false);

    Ok(Post {
        id: row.id,
        author_id: row.author_id,
        title: row.title,
        body: row.body,
        category,
        tags: row.tags,
        image_urls: row.image_urls,
        image_url: row.image_url,
        created_at: row.created_at,
        likes_count: likes.len() as u64,
        comments_count,
        viewer_has_liked,
        author,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_split_trimmed_and_kept_in_order() {
        assert_eq!(
            parse_tags(" trip , Food ,, fitness ,"),
            vec!["trip", "Food", "fitness"]
        );
    }

    #[test]
    fn tags_are_not_deduplicated() {
        assert_eq!(parse_tags("a,a, a"), vec!["a", "a", "a"]);
    }

    #[test]
    fn empty_input_yields_no_tags() {
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }
}
