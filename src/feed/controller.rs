// Feed Controller - owns the in-memory feed and per-post comment threads,
// and is the only writer to either. Views read snapshots; every mutation
// goes through one of the entry points below.

use super::filter::{CategoryFilter, FeedFilter};
use super::thread::{CommentThread, LoadPhase};
use crate::core::PostId;
use crate::error::{AppError, AppResult};
use crate::gateway::DataGateway;
use crate::models::{NewPost, Post};
use crate::repository::{CommentRepository, PostRepository, ProfileDirectory};
use crate::viewer::ViewerContext;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

pub struct FeedController {
    posts: PostRepository,
    comments: CommentRepository,
    viewer: Option<ViewerContext>,
    /// Newest first; rebuilt wholesale by `refresh`, patched by mutations.
    feed: Vec<Post>,
    threads: HashMap<PostId, CommentThread>,
    filter: FeedFilter,
}

impl FeedController {
    pub fn new(gateway: Arc<dyn DataGateway>, viewer: Option<ViewerContext>) -> Self {
        let profiles = Arc::new(ProfileDirectory::new(
            gateway.clone(),
            ProfileDirectory::DEFAULT_CAPACITY,
        ));
        Self::with_repositories(
            PostRepository::new(gateway.clone(), profiles.clone()),
            CommentRepository::new(gateway, profiles),
            viewer,
        )
    }

    pub fn with_repositories(
        posts: PostRepository,
        comments: CommentRepository,
        viewer: Option<ViewerContext>,
    ) -> Self {
        Self {
            posts,
            comments,
            viewer,
            feed: Vec::new(),
            threads: HashMap::new(),
            filter: FeedFilter::default(),
        }
    }

    pub fn viewer(&self) -> Option<&ViewerContext> {
        self.viewer.as_ref()
    }

    /// Rebuild the feed wholesale from the gateway. On failure the previous
    /// feed stays in place.
    pub async fn refresh(&mut self) -> AppResult<()> {
        let viewer = self.viewer.map(|v| v.user_id);
        let posts = self.posts.list_posts(viewer).await?;
        self.feed = posts;
        Ok(())
    }

    /// All loaded posts, newest first.
    pub fn posts(&self) -> &[Post] {
        &self.feed
    }

    pub fn post(&self, post_id: PostId) -> Option<&Post> {
        self.feed.iter().find(|p| p.id == post_id)
    }

    /// The filtered projection consumed by presentation. Purely local; never
    /// triggers a remote call.
    pub fn visible_posts(&self) -> Vec<&Post> {
        self.feed
            .iter()
            .filter(|p| self.filter.matches(p))
            .collect()
    }

    pub fn filter(&self) -> &FeedFilter {
        &self.filter
    }

    /// An empty or whitespace-only tag clears the tag filter.
    pub fn set_tag_filter(&mut self, tag: &str) {
        let tag = tag.trim();
        self.filter.tag = if tag.is_empty() {
            None
        } else {
            Some(tag.to_string())
        };
    }

    pub fn set_category_filter(&mut self, category: CategoryFilter) {
        self.filter.category = category;
    }

    pub fn clear_filters(&mut self) {
        self.filter = FeedFilter::default();
    }

    /// Create a post and refresh the feed. Not optimistic: nothing is
    /// inserted locally until the gateway confirms.
    pub async fn create_post(&mut self, new_post: NewPost) -> AppResult<PostId> {
        let viewer = self.require_viewer("post")?;
        let created = self.posts.create_post(viewer.user_id, new_post).await?;
        info!(post_id = %created.id, "created community post");
        self.refresh().await?;
        Ok(created.id)
    }

    /// Toggle the viewer's like on a post. Fully optimistic: the local flag
    /// and count flip before the gateway call, and a remote failure is logged
    /// and swallowed without rollback - the user never sees a like error,
    /// unlike every other mutation. An unknown post id is a silent no-op.
    pub async fn toggle_like(&mut self, post_id: PostId) -> AppResult<()> {
        let viewer = self.require_viewer("like posts")?;
        let Some(post) = self.feed.iter_mut().find(|p| p.id == post_id) else {
            return Ok(());
        };

        let was_liked = post.viewer_has_liked;
        post.viewer_has_liked = !was_liked;
        if was_liked {
            post.likes_count = post.likes_count.saturating_sub(1);
        } else {
            post.likes_count += 1;
        }

        let result = if was_liked {
            self.posts.unlike(post_id, viewer.user_id).await
        } else {
            self.posts.like(post_id, viewer.user_id).await
        };
        if let Err(err) = result {
            warn!(%post_id, "like toggle failed: {}", err);
        }
        Ok(())
    }

    /// Open or close a post's comment panel. The first open fetches the
    /// thread; closing hides it without evicting; reopening a loaded thread
    /// does not fetch again.
    pub async fn toggle_comments(&mut self, post_id: PostId) -> AppResult<()> {
        let thread = self.threads.entry(post_id).or_default();
        if thread.visible {
            thread.visible = false;
            return Ok(());
        }
        thread.visible = true;
        if thread.phase == LoadPhase::Loaded {
            return Ok(());
        }
        self.reload_thread(post_id).await
    }

    pub fn thread(&self, post_id: PostId) -> Option<&CommentThread> {
        self.threads.get(&post_id)
    }

    /// Add a comment, bump the parent post's count by exactly one, then
    /// re-fetch the thread so server-assigned ids and timestamps stay
    /// authoritative.
    pub async fn add_comment(&mut self, post_id: PostId, body: &str) -> AppResult<()> {
        let viewer = self.require_viewer("comment")?;
        self.comments
            .add_comment(post_id, viewer.user_id, body)
            .await?;

        if let Some(post) = self.feed.iter_mut().find(|p| p.id == post_id) {
            post.comments_count += 1;
        }
        self.reload_thread(post_id).await
    }

    /// Fetch a thread and overwrite the cached copy. Fetches triggered by
    /// distinct actions may resolve out of order; the last resolution to
    /// complete wins. On failure the previous phase is restored so a later
    /// open retries.
    async fn reload_thread(&mut self, post_id: PostId) -> AppResult<()> {
        let previous = {
            let thread = self.threads.entry(post_id).or_default();
            let previous = thread.phase;
            thread.phase = LoadPhase::Loading;
            previous
        };

        match self.comments.list_comments(post_id).await {
            Ok(comments) => {
                let thread = self.threads.entry(post_id).or_default();
                thread.comments = comments;
                thread.phase = LoadPhase::Loaded;
                Ok(())
            }
            Err(err) => {
                let thread = self.threads.entry(post_id).or_default();
                thread.phase = previous;
                Err(err)
            }
        }
    }

    fn require_viewer(&self, action: &str) -> AppResult<ViewerContext> {
        self.viewer.ok_or_else(|| {
            AppError::AuthRequired(format!("please sign in to {}", action))
        })
    }
}
