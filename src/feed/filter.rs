// Feed filters - a purely local projection over the loaded posts. Applying
// or changing a filter never touches the gateway.

use crate::core::PostCategory;
use crate::models::Post;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(PostCategory),
}

/// Tag and category filters compose with logical AND.
#[derive(Debug, Clone, Default)]
pub struct FeedFilter {
    /// Exact, case-insensitive match against any tag of the post.
    pub tag: Option<String>,
    pub category: CategoryFilter,
}

impl FeedFilter {
    pub fn matches(&self, post: &Post) -> bool {
        let tag_ok = match &self.tag {
            None => true,
            Some(wanted) => {
                let wanted = wanted.to_lowercase();
                post.tags.iter().any(|t| t.to_lowercase() == wanted)
            }
        };
        let category_ok = match self.category {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => post.category == category,
        };
        tag_ok && category_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn post_with(tags: &[&str], category: PostCategory) -> Post {
        Post {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            title: "t".to_string(),
            body: "b".to_string(),
            category,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            image_urls: Vec::new(),
            image_url: None,
            created_at: Utc::now(),
            likes_count: 0,
            comments_count: 0,
            viewer_has_liked: false,
            author: None,
        }
    }

    #[test]
    fn tag_filter_matches_case_insensitively() {
        let filter = FeedFilter {
            tag: Some("Trip".to_string()),
            category: CategoryFilter::All,
        };
        assert!(filter.matches(&post_with(&["trip", "Food"], PostCategory::General)));
        assert!(!filter.matches(&post_with(&["food"], PostCategory::General)));
    }

    #[test]
    fn filters_compose_with_and() {
        let filter = FeedFilter {
            tag: Some("trip".to_string()),
            category: CategoryFilter::Only(PostCategory::Help),
        };
        assert!(filter.matches(&post_with(&["Trip"], PostCategory::Help)));
        assert!(!filter.matches(&post_with(&["Trip"], PostCategory::General)));
        assert!(!filter.matches(&post_with(&["food"], PostCategory::Help)));
    }

    #[test]
    fn default_filter_matches_everything() {
        let filter = FeedFilter::default();
        assert!(filter.matches(&post_with(&[], PostCategory::Discussion)));
    }
}
