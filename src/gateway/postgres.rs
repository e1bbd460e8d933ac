// Postgres gateway - production implementation of the row contract over a
// sqlx connection pool. All failures surface as opaque gateway errors; the
// repositories translate them at their boundary.

use super::rows::{CommentRow, LikeRow, NewCommentRow, NewPostRow, PostRow, ProfileRow};
use super::DataGateway;
use crate::core::{PostId, UserId};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PostgresGateway {
    pool: PgPool,
}

impl PostgresGateway {
    pub async fn connect(url: &str) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .connect(url)
            .await
            .map_err(|e| {
                AppError::Configuration(format!("failed to connect to {}: {}", url, e))
            })?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the feed tables if they do not exist yet.
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                id UUID PRIMARY KEY,
                username TEXT,
                display_name TEXT,
                avatar_url TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(to_gateway_error)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id UUID PRIMARY KEY,
                author_id UUID NOT NULL,
                title TEXT NOT NULL,
                body TEXT NOT NULL,
                post_type TEXT NOT NULL,
                tags TEXT[] NOT NULL DEFAULT '{}',
                image_url TEXT,
                image_urls TEXT[] NOT NULL DEFAULT '{}',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(to_gateway_error)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS post_likes (
                post_id UUID NOT NULL,
                user_id UUID NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (post_id, user_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(to_gateway_error)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS post_comments (
                id UUID PRIMARY KEY,
                post_id UUID NOT NULL,
                author_id UUID NOT NULL,
                body TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(to_gateway_error)?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_created ON posts (created_at DESC)")
            .execute(&self.pool)
            .await
            .map_err(to_gateway_error)?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_comments_post ON post_comments (post_id, created_at)",
        )
        .execute(&self.pool)
        .await
        .map_err(to_gateway_error)?;

        Ok(())
    }
}

fn to_gateway_error(err: sqlx::Error) -> AppError {
    AppError::Gateway(err.into())
}

#[async_trait]
impl DataGateway for PostgresGateway {
    async fn fetch_posts(&self) -> AppResult<Vec<PostRow>> {
        sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, author_id, title, body, post_type, tags, image_url, image_urls, created_at
            FROM posts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(to_gateway_error)
    }

    async fn insert_post(&self, row: NewPostRow) -> AppResult<PostRow> {
        sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (id, author_id, title, body, post_type, tags, image_url, image_urls)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, author_id, title, body, post_type, tags, image_url, image_urls, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(row.author_id)
        .bind(&row.title)
        .bind(&row.body)
        .bind(&row.post_type)
        .bind(&row.tags)
        .bind(&row.image_url)
        .bind(&row.image_urls)
        .fetch_one(&self.pool)
        .await
        .map_err(to_gateway_error)
    }

    async fn fetch_likes(&self, post_id: PostId) -> AppResult<Vec<LikeRow>> {
        sqlx::query_as::<_, LikeRow>(
            r#"
            SELECT post_id, user_id, created_at
            FROM post_likes
            WHERE post_id = $1
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(to_gateway_error)
    }

    async fn insert_like(&self, post_id: PostId, user_id: UserId) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO post_likes (post_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (post_id, user_id) DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(to_gateway_error)?;
        Ok(())
    }

    async fn delete_like(&self, post_id: PostId, user_id: UserId) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM post_likes
            WHERE post_id = $1 AND user_id = $2
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(to_gateway_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn fetch_comments(&self, post_id: PostId) -> AppResult<Vec<CommentRow>> {
        sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, author_id, body, created_at
            FROM post_comments
            WHERE post_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(to_gateway_error)
    }

    async fn count_comments(&self, post_id: PostId) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM post_comments
            WHERE post_id = $1
            "#,
        )
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
        .map_err(to_gateway_error)?;
        Ok(count as u64)
    }

    async fn insert_comment(&self, row: NewCommentRow) -> AppResult<CommentRow> {
        sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO post_comments (id, post_id, author_id, body)
            VALUES ($1, $2, $3, $4)
            RETURNING id, post_id, author_id, body, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(row.post_id)
        .bind(row.author_id)
        .bind(&row.body)
        .fetch_one(&self.pool)
        .await
        .map_err(to_gateway_error)
    }

    async fn fetch_profiles(&self, user_ids: &[UserId]) -> AppResult<Vec<ProfileRow>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, username, display_name, avatar_url
            FROM profiles
            WHERE id = ANY($1)
            "#,
        )
        .bind(user_ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(to_gateway_error)
    }

    async fn update_avatar(&self, user_id: UserId, avatar_url: &str) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET avatar_url = $2
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(avatar_url)
        .execute(&self.pool)
        .await
        .map_err(to_gateway_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("profile {}", user_id)));
        }
        Ok(())
    }
}
