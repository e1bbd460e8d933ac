// In-memory gateway used by integration tests and the no-database demo
// server. Keeps the same observable contract as the Postgres backend and
// adds fixture helpers, per-operation call counters, and failure injection.

use super::rows::{CommentRow, LikeRow, NewCommentRow, NewPostRow, PostRow, ProfileRow};
use super::DataGateway;
use crate::core::{PostId, UserId};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct MemoryGateway {
    posts: RwLock<Vec<PostRow>>,
    likes: RwLock<Vec<LikeRow>>,
    comments: RwLock<Vec<CommentRow>>,
    profiles: RwLock<Vec<ProfileRow>>,

    fail_reads: AtomicBool,
    fail_writes: AtomicBool,

    post_fetches: AtomicUsize,
    post_inserts: AtomicUsize,
    comment_fetches: AtomicUsize,
    profile_fetches: AtomicUsize,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read fail until cleared.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write fail until cleared.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn post_fetch_count(&self) -> usize {
        self.post_fetches.load(Ordering::SeqCst)
    }

    pub fn post_insert_count(&self) -> usize {
        self.post_inserts.load(Ordering::SeqCst)
    }

    pub fn comment_fetch_count(&self) -> usize {
        self.comment_fetches.load(Ordering::SeqCst)
    }

    pub fn profile_fetch_count(&self) -> usize {
        self.profile_fetches.load(Ordering::SeqCst)
    }

    /// Fixture helper: register a profile row.
    pub async fn add_profile(
        &self,
        id: UserId,
        username: &str,
        display_name: Option<&str>,
        avatar_url: Option<&str>,
    ) {
        self.profiles.write().await.push(ProfileRow {
            id,
            username: Some(username.to_string()),
            display_name: display_name.map(str::to_string),
            avatar_url: avatar_url.map(str::to_string),
        });
    }

    /// Fixture helper: insert a post with an explicit creation time.
    pub async fn add_post_at(
        &self,
        row: NewPostRow,
        created_at: DateTime<Utc>,
    ) -> PostRow {
        let stored = PostRow {
            id: Uuid::new_v4(),
            author_id: row.author_id,
            title: row.title,
            body: row.body,
            post_type: row.post_type,
            tags: row.tags,
            image_url: row.image_url,
            image_urls: row.image_urls,
            created_at,
        };
        self.posts.write().await.push(stored.clone());
        stored
    }

    fn check_read(&self) -> AppResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(AppError::Gateway(anyhow::anyhow!(
                "injected read failure"
            )))
        } else {
            Ok(())
        }
    }

    fn check_write(&self) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(AppError::Gateway(anyhow::anyhow!(
                "injected write failure"
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DataGateway for MemoryGateway {
    async fn fetch_posts(&self) -> AppResult<Vec<PostRow>> {
        self.post_fetches.fetch_add(1, Ordering::SeqCst);
        self.check_read()?;
        let mut rows = self.posts.read().await.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_post(&self, row: NewPostRow) -> AppResult<PostRow> {
        self.post_inserts.fetch_add(1, Ordering::SeqCst);
        self.check_write()?;
        Ok(self.add_post_at(row, Utc::now()).await)
    }

    async fn fetch_likes(&self, post_id: PostId) -> AppResult<Vec<LikeRow>> {
        self.check_read()?;
        Ok(self
            .likes
            .read()
            .await
            .iter()
            .filter(|l| l.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn insert_like(&self, post_id: PostId, user_id: UserId) -> AppResult<()> {
        self.check_write()?;
        let mut likes = self.likes.write().await;
        // Uniqueness per (post, user) pair
        if !likes
            .iter()
            .any(|l| l.post_id == post_id && l.user_id == user_id)
        {
            likes.push(LikeRow {
                post_id,
                user_id,
                created_at: Utc::now(),
            });
        }
        Ok(())
    }

    async fn delete_like(&self, post_id: PostId, user_id: UserId) -> AppResult<bool> {
        self.check_write()?;
        let mut likes = self.likes.write().await;
        let before = likes.len();
        likes.retain(|l| !(l.post_id == post_id && l.user_id == user_id));
        Ok(likes.len() < before)
    }

    async fn fetch_comments(&self, post_id: PostId) -> AppResult<Vec<CommentRow>> {
        self.comment_fetches.fetch_add(1, Ordering::SeqCst);
        self.check_read()?;
        let mut rows: Vec<CommentRow> = self
            .comments
            .read()
            .await
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn count_comments(&self, post_id: PostId) -> AppResult<u64> {
        self.check_read()?;
        Ok(self
            .comments
            .read()
            .await
            .iter()
            .filter(|c| c.post_id == post_id)
            .count() as u64)
    }

    async fn insert_comment(&self, row: NewCommentRow) -> AppResult<CommentRow> {
        self.check_write()?;
        let stored = CommentRow {
            id: Uuid::new_v4(),
            post_id: row.post_id,
            author_id: row.author_id,
            body: row.body,
            created_at: Utc::now(),
        };
        self.comments.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn fetch_profiles(&self, user_ids: &[UserId]) -> AppResult<Vec<ProfileRow>> {
        self.profile_fetches.fetch_add(1, Ordering::SeqCst);
        self.check_read()?;
        Ok(self
            .profiles
            .read()
            .await
            .iter()
            .filter(|p| user_ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn update_avatar(&self, user_id: UserId, avatar_url: &str) -> AppResult<()> {
        self.check_write()?;
        let mut profiles = self.profiles.write().await;
        match profiles.iter_mut().find(|p| p.id == user_id) {
            Some(profile) => {
                profile.avatar_url = Some(avatar_url.to_string());
                Ok(())
            }
            None => Err(AppError::NotFound(format!("profile {}", user_id))),
        }
    }
}
