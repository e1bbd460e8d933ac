// Core types and primitives shared across the feed data layer.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Current time in milliseconds since Unix epoch
pub fn current_time_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}

/// Identity of a post row
pub type PostId = Uuid;

/// Identity of a comment row
pub type CommentId = Uuid;

/// Identity of a user / profile row
pub type UserId = Uuid;

/// Post category, persisted verbatim as a lowercase string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostCategory {
    General,
    Help,
    Achievement,
    Discussion,
}

impl PostCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostCategory::General => "general",
            PostCategory::Help => "help",
            PostCategory::Achievement => "achievement",
            PostCategory::Discussion => "discussion",
        }
    }
}

impl fmt::Display for PostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(PostCategory::General),
            "help" => Ok(PostCategory::Help),
            "achievement" => Ok(PostCategory::Achievement),
            "discussion" => Ok(PostCategory::Discussion),
            other => Err(AppError::Validation(format!(
                "unknown post category: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_str() {
        for category in [
            PostCategory::General,
            PostCategory::Help,
            PostCategory::Achievement,
            PostCategory::Discussion,
        ] {
            assert_eq!(category.as_str().parse::<PostCategory>().unwrap(), category);
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!("rant".parse::<PostCategory>().is_err());
    }
}
