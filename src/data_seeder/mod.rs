// Demo fixtures for the in-memory backend: a few profiles, posts across all
// categories, comments, and randomised likes. Enough to exercise the feed
// end to end without a database.

use crate::core::PostCategory;
use crate::error::AppResult;
use crate::gateway::{DataGateway, MemoryGateway, NewCommentRow, NewPostRow};
use chrono::{Duration, Utc};
use rand::Rng;
use tracing::info;
use uuid::Uuid;

pub async fn seed_demo_data(gateway: &MemoryGateway) -> AppResult<()> {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let carol = Uuid::new_v4();

    gateway
        .add_profile(alice, "alice", Some("Alice Winters"), None)
        .await;
    gateway
        .add_profile(bob, "bob", Some("Bob Tanaka"), None)
        .await;
    gateway.add_profile(carol, "carol", None, None).await;

    let fixtures = [
        (
            alice,
            "Finished my first 10k!",
            "Three months of training paid off this morning.",
            PostCategory::Achievement,
            vec!["running", "fitness"],
        ),
        (
            bob,
            "How do you stay consistent?",
            "I keep dropping my habits after two weeks. Any advice?",
            PostCategory::Help,
            vec!["habits"],
        ),
        (
            carol,
            "Weekend trip photos",
            "Sharing a few shots from the north shore.",
            PostCategory::General,
            vec!["trip", "photography"],
        ),
        (
            alice,
            "Favorite productivity setups?",
            "Curious what everyone's desk and toolchain look like.",
            PostCategory::Discussion,
            vec!["productivity"],
        ),
    ];

    let users = [alice, bob, carol];
    let total = fixtures.len();
    let mut post_ids = Vec::new();
    for (i, (author, title, body, category, tags)) in fixtures.into_iter().enumerate() {
        let row = NewPostRow {
            author_id: author,
            title: title.to_string(),
            body: body.to_string(),
            post_type: category.as_str().to_string(),
            tags: tags.into_iter().map(str::to_string).collect(),
            image_url: None,
            image_urls: Vec::new(),
        };
        // Spread creation times so the feed has a stable order.
        let created_at = Utc::now() - Duration::minutes((total - i) as i64 * 17);
        let stored = gateway.add_post_at(row, created_at).await;
        post_ids.push(stored.id);
    }

    for post_id in &post_ids {
        for user in users {
            if rand::rng().random_bool(0.4) {
                gateway.insert_like(*post_id, user).await?;
            }
        }
    }

    gateway
        .insert_comment(NewCommentRow {
            post_id: post_ids[0],
            author_id: bob,
            body: "Huge congrats!".to_string(),
        })
        .await?;
    gateway
        .insert_comment(NewCommentRow {
            post_id: post_ids[1],
            author_id: alice,
            body: "Start smaller than feels useful, then scale up.".to_string(),
        })
        .await?;

    info!(posts = post_ids.len(), "seeded demo data");
    Ok(())
}
