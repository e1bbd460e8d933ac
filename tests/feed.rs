// End-to-end behavior of the feed controller and repositories against the
// in-memory gateway.

use chrono::{Duration, Utc};
use community_feed::core::{PostCategory, PostId, UserId};
use community_feed::feed::{CategoryFilter, FeedController, LoadPhase};
use community_feed::gateway::{MemoryGateway, NewCommentRow, NewPostRow};
use community_feed::models::NewPost;
use community_feed::{AppError, ViewerContext};
use std::sync::Arc;
use uuid::Uuid;

async fn seed_user(gateway: &MemoryGateway, name: &str) -> UserId {
    let id = Uuid::new_v4();
    gateway.add_profile(id, name, None, None).await;
    id
}

async fn seed_post(
    gateway: &MemoryGateway,
    author: UserId,
    title: &str,
    tags: &[&str],
    category: PostCategory,
    minutes_ago: i64,
) -> PostId {
    let row = NewPostRow {
        author_id: author,
        title: title.to_string(),
        body: format!("{} body", title),
        post_type: category.as_str().to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        image_url: None,
        image_urls: Vec::new(),
    };
    gateway
        .add_post_at(row, Utc::now() - Duration::minutes(minutes_ago))
        .await
        .id
}

fn draft(title: &str, body: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        body: body.to_string(),
        category: PostCategory::General,
        tags_input: String::new(),
        image_urls: Vec::new(),
    }
}

fn controller_for(gateway: &Arc<MemoryGateway>, viewer: Option<UserId>) -> FeedController {
    FeedController::new(gateway.clone(), viewer.map(ViewerContext::new))
}

#[tokio::test]
async fn likes_count_matches_distinct_likers_at_quiescence() {
    let gateway = Arc::new(MemoryGateway::new());
    let alice = seed_user(&gateway, "alice").await;
    let bob = seed_user(&gateway, "bob").await;
    let post = seed_post(&gateway, alice, "hello", &[], PostCategory::General, 5).await;

    let mut as_alice = controller_for(&gateway, Some(alice));
    let mut as_bob = controller_for(&gateway, Some(bob));
    as_alice.refresh().await.unwrap();
    as_bob.refresh().await.unwrap();

    as_alice.toggle_like(post).await.unwrap();
    as_bob.toggle_like(post).await.unwrap();
    as_bob.toggle_like(post).await.unwrap();
    as_bob.toggle_like(post).await.unwrap();

    // A fresh listing recomputes the count from the authoritative join.
    let mut fresh = controller_for(&gateway, None);
    fresh.refresh().await.unwrap();
    assert_eq!(fresh.post(post).unwrap().likes_count, 2);
}

#[tokio::test]
async fn double_toggle_is_an_idempotent_pair() {
    let gateway = Arc::new(MemoryGateway::new());
    let alice = seed_user(&gateway, "alice").await;
    let bob = seed_user(&gateway, "bob").await;
    let post = seed_post(&gateway, alice, "hello", &[], PostCategory::General, 5).await;
    // A pre-existing like from someone else.
    use community_feed::gateway::DataGateway;
    gateway.insert_like(post, alice).await.unwrap();

    let mut controller = controller_for(&gateway, Some(bob));
    controller.refresh().await.unwrap();
    assert_eq!(controller.post(post).unwrap().likes_count, 1);

    controller.toggle_like(post).await.unwrap();
    controller.toggle_like(post).await.unwrap();

    let visible = controller.post(post).unwrap();
    assert!(!visible.viewer_has_liked);
    assert_eq!(visible.likes_count, 1);
}

#[tokio::test]
async fn tag_filter_matches_case_insensitively() {
    let gateway = Arc::new(MemoryGateway::new());
    let alice = seed_user(&gateway, "alice").await;
    let tagged = seed_post(
        &gateway,
        alice,
        "north shore",
        &["trip", "Food"],
        PostCategory::General,
        10,
    )
    .await;
    seed_post(&gateway, alice, "recipes", &["food"], PostCategory::General, 5).await;

    let mut controller = controller_for(&gateway, None);
    controller.refresh().await.unwrap();

    controller.set_tag_filter("Trip");
    let visible = controller.visible_posts();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, tagged);
}

#[tokio::test]
async fn category_and_tag_filters_compose_with_and() {
    let gateway = Arc::new(MemoryGateway::new());
    let alice = seed_user(&gateway, "alice").await;
    let wanted = seed_post(&gateway, alice, "a", &["trip"], PostCategory::Help, 3).await;
    seed_post(&gateway, alice, "b", &["trip"], PostCategory::General, 2).await;
    seed_post(&gateway, alice, "c", &["food"], PostCategory::Help, 1).await;

    let mut controller = controller_for(&gateway, None);
    controller.refresh().await.unwrap();

    controller.set_tag_filter("trip");
    controller.set_category_filter(CategoryFilter::Only(PostCategory::Help));
    let visible = controller.visible_posts();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, wanted);

    controller.clear_filters();
    assert_eq!(controller.visible_posts().len(), 3);
}

#[tokio::test]
async fn whitespace_title_never_reaches_the_gateway() {
    let gateway = Arc::new(MemoryGateway::new());
    let alice = seed_user(&gateway, "alice").await;

    let mut controller = controller_for(&gateway, Some(alice));
    let err = controller
        .create_post(draft("   ", "a perfectly fine body"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(gateway.post_insert_count(), 0);
}

#[tokio::test]
async fn listing_is_newest_first() {
    let gateway = Arc::new(MemoryGateway::new());
    let alice = seed_user(&gateway, "alice").await;
    let t1 = seed_post(&gateway, alice, "first", &[], PostCategory::General, 30).await;
    let t2 = seed_post(&gateway, alice, "second", &[], PostCategory::General, 20).await;
    let t3 = seed_post(&gateway, alice, "third", &[], PostCategory::General, 10).await;

    let mut controller = controller_for(&gateway, None);
    controller.refresh().await.unwrap();

    let order: Vec<PostId> = controller.posts().iter().map(|p| p.id).collect();
    assert_eq!(order, vec![t3, t2, t1]);
}

#[tokio::test]
async fn optimistic_comment_count_agrees_with_refetch() {
    let gateway = Arc::new(MemoryGateway::new());
    let alice = seed_user(&gateway, "alice").await;
    let bob = seed_user(&gateway, "bob").await;
    let post = seed_post(&gateway, alice, "hello", &[], PostCategory::General, 5).await;
    use community_feed::gateway::DataGateway;
    for body in ["one", "two"] {
        gateway
            .insert_comment(NewCommentRow {
                post_id: post,
                author_id: alice,
                body: body.to_string(),
            })
            .await
            .unwrap();
    }

    let mut controller = controller_for(&gateway, Some(bob));
    controller.refresh().await.unwrap();
    assert_eq!(controller.post(post).unwrap().comments_count, 2);

    controller.toggle_comments(post).await.unwrap();
    controller.add_comment(post, "three").await.unwrap();

    assert_eq!(controller.post(post).unwrap().comments_count, 3);
    let thread = controller.thread(post).unwrap();
    assert_eq!(thread.phase(), LoadPhase::Loaded);
    assert_eq!(thread.comments().len(), 3);
}

#[tokio::test]
async fn reopening_a_thread_does_not_fetch_again() {
    let gateway = Arc::new(MemoryGateway::new());
    let alice = seed_user(&gateway, "alice").await;
    let post = seed_post(&gateway, alice, "hello", &[], PostCategory::General, 5).await;

    let mut controller = controller_for(&gateway, Some(alice));
    controller.refresh().await.unwrap();

    controller.toggle_comments(post).await.unwrap();
    assert!(controller.thread(post).unwrap().is_visible());

    controller.toggle_comments(post).await.unwrap();
    let thread = controller.thread(post).unwrap();
    assert!(!thread.is_visible());
    // Closing retains the fetched comments.
    assert!(thread.is_loaded());

    controller.toggle_comments(post).await.unwrap();
    assert!(controller.thread(post).unwrap().is_visible());

    assert_eq!(gateway.comment_fetch_count(), 1);
}

#[tokio::test]
async fn unauthenticated_mutations_are_rejected_before_any_remote_call() {
    let gateway = Arc::new(MemoryGateway::new());
    let alice = seed_user(&gateway, "alice").await;
    let post = seed_post(&gateway, alice, "hello", &[], PostCategory::General, 5).await;

    let mut controller = controller_for(&gateway, None);
    controller.refresh().await.unwrap();

    let err = controller.toggle_like(post).await.unwrap_err();
    assert!(matches!(err, AppError::AuthRequired(_)));
    assert_eq!(controller.post(post).unwrap().likes_count, 0);

    let err = controller.create_post(draft("t", "b")).await.unwrap_err();
    assert!(matches!(err, AppError::AuthRequired(_)));
    assert_eq!(gateway.post_insert_count(), 0);

    let err = controller.add_comment(post, "hi").await.unwrap_err();
    assert!(matches!(err, AppError::AuthRequired(_)));
    assert_eq!(controller.post(post).unwrap().comments_count, 0);
}

#[tokio::test]
async fn like_toggle_failure_is_silent_and_keeps_optimistic_state() {
    let gateway = Arc::new(MemoryGateway::new());
    let alice = seed_user(&gateway, "alice").await;
    let post = seed_post(&gateway, alice, "hello", &[], PostCategory::General, 5).await;

    let mut controller = controller_for(&gateway, Some(alice));
    controller.refresh().await.unwrap();

    gateway.fail_writes(true);
    controller.toggle_like(post).await.unwrap();

    let visible = controller.post(post).unwrap();
    assert!(visible.viewer_has_liked);
    assert_eq!(visible.likes_count, 1);

    // The authoritative state never recorded the like.
    gateway.fail_writes(false);
    let mut fresh = controller_for(&gateway, Some(alice));
    fresh.refresh().await.unwrap();
    assert_eq!(fresh.post(post).unwrap().likes_count, 0);
}

#[tokio::test]
async fn failed_create_leaves_the_feed_untouched() {
    let gateway = Arc::new(MemoryGateway::new());
    let alice = seed_user(&gateway, "alice").await;
    seed_post(&gateway, alice, "hello", &[], PostCategory::General, 5).await;

    let mut controller = controller_for(&gateway, Some(alice));
    controller.refresh().await.unwrap();

    gateway.fail_writes(true);
    let err = controller.create_post(draft("t", "b")).await.unwrap_err();
    assert!(matches!(err, AppError::Create(_)));
    assert_eq!(controller.posts().len(), 1);
}

#[tokio::test]
async fn failed_refresh_preserves_the_previous_feed() {
    let gateway = Arc::new(MemoryGateway::new());
    let alice = seed_user(&gateway, "alice").await;
    seed_post(&gateway, alice, "hello", &[], PostCategory::General, 5).await;

    let mut controller = controller_for(&gateway, None);
    controller.refresh().await.unwrap();
    assert_eq!(controller.posts().len(), 1);

    gateway.fail_reads(true);
    let err = controller.refresh().await.unwrap_err();
    assert!(matches!(err, AppError::Fetch(_)));
    assert_eq!(controller.posts().len(), 1);
}

#[tokio::test]
async fn failed_thread_fetch_allows_a_later_retry() {
    let gateway = Arc::new(MemoryGateway::new());
    let alice = seed_user(&gateway, "alice").await;
    let post = seed_post(&gateway, alice, "hello", &[], PostCategory::General, 5).await;

    let mut controller = controller_for(&gateway, Some(alice));
    controller.refresh().await.unwrap();

    gateway.fail_reads(true);
    let err = controller.toggle_comments(post).await.unwrap_err();
    assert!(matches!(err, AppError::Fetch(_)));
    let thread = controller.thread(post).unwrap();
    assert!(thread.is_visible());
    assert!(!thread.is_loaded());

    // Close, reopen with reads healthy again: the fetch runs this time.
    gateway.fail_reads(false);
    controller.toggle_comments(post).await.unwrap();
    controller.toggle_comments(post).await.unwrap();
    assert!(controller.thread(post).unwrap().is_loaded());
}

#[tokio::test]
async fn profile_join_is_one_membership_query_per_listing() {
    let gateway = Arc::new(MemoryGateway::new());
    let alice = seed_user(&gateway, "alice").await;
    let bob = seed_user(&gateway, "bob").await;
    seed_post(&gateway, alice, "a", &[], PostCategory::General, 3).await;
    seed_post(&gateway, bob, "b", &[], PostCategory::General, 2).await;
    seed_post(&gateway, alice, "c", &[], PostCategory::General, 1).await;

    let mut controller = controller_for(&gateway, None);
    controller.refresh().await.unwrap();

    assert_eq!(gateway.profile_fetch_count(), 1);
    let authors: Vec<_> = controller
        .posts()
        .iter()
        .map(|p| p.author.as_ref().unwrap().username.clone().unwrap())
        .collect();
    assert_eq!(authors, vec!["alice", "bob", "alice"]);
}

#[tokio::test]
async fn empty_comment_blocks_submission_locally() {
    let gateway = Arc::new(MemoryGateway::new());
    let alice = seed_user(&gateway, "alice").await;
    let post = seed_post(&gateway, alice, "hello", &[], PostCategory::General, 5).await;

    let mut controller = controller_for(&gateway, Some(alice));
    controller.refresh().await.unwrap();

    let err = controller.add_comment(post, "   ").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(controller.post(post).unwrap().comments_count, 0);
    assert_eq!(gateway.comment_fetch_count(), 0);
}

#[tokio::test]
async fn created_post_carries_parsed_tags_and_legacy_image_field() {
    let gateway = Arc::new(MemoryGateway::new());
    let alice = seed_user(&gateway, "alice").await;

    let mut controller = controller_for(&gateway, Some(alice));
    controller.refresh().await.unwrap();

    let id = controller
        .create_post(NewPost {
            title: "  trip report  ".to_string(),
            body: "long ride".to_string(),
            category: PostCategory::Achievement,
            tags_input: " trip , Food ,, ".to_string(),
            image_urls: vec!["/media/posts/a.png".to_string(), "/media/posts/b.png".to_string()],
        })
        .await
        .unwrap();

    let post = controller.post(id).unwrap();
    assert_eq!(post.title, "trip report");
    assert_eq!(post.tags, vec!["trip", "Food"]);
    assert_eq!(post.image_urls.len(), 2);
    assert_eq!(post.image_url.as_deref(), Some("/media/posts/a.png"));
    assert_eq!(post.category, PostCategory::Achievement);
}
