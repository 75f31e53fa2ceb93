use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::validation::ValidationError;

/// Avatar identifiers the frontend knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Avatar {
    #[default]
    Default,
    Fox,
    Cat,
    Panda,
    Owl,
    Rabbit,
    Ninja,
    Samurai,
}

impl Avatar {
    pub const ALL: [Avatar; 8] = [
        Avatar::Default,
        Avatar::Fox,
        Avatar::Cat,
        Avatar::Panda,
        Avatar::Owl,
        Avatar::Rabbit,
        Avatar::Ninja,
        Avatar::Samurai,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Avatar::Default => "default",
            Avatar::Fox => "fox",
            Avatar::Cat => "cat",
            Avatar::Panda => "panda",
            Avatar::Owl => "owl",
            Avatar::Rabbit => "rabbit",
            Avatar::Ninja => "ninja",
            Avatar::Samurai => "samurai",
        }
    }
}

impl FromStr for Avatar {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Avatar::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownAvatar(s.to_string()))
    }
}

impl fmt::Display for Avatar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub anime_id: String,
    pub episode_id: String,
    pub user_name: String,
    pub user_avatar: Avatar,
    pub text: String,
    pub timestamp: NaiveDateTime,
    pub likes: i64,
    pub parent_id: Option<String>,
    pub is_reply: bool,
}

/// A top-level comment with its replies, oldest reply first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadedComment {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<Comment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Recent,
    Likes,
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recent" => Ok(SortOrder::Recent),
            "likes" => Ok(SortOrder::Likes),
            other => Err(ValidationError::UnknownSortOrder(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPage {
    pub comments: Vec<ThreadedComment>,
    pub total_count: i64,
    pub has_more: bool,
    pub page: i64,
    pub limit: i64,
}

impl CommentPage {
    pub fn new(comments: Vec<ThreadedComment>, total_count: i64, page: i64, limit: i64) -> Self {
        Self {
            comments,
            total_count,
            has_more: page.saturating_mul(limit) < total_count,
            page,
            limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anime {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub view_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularAnime {
    #[serde(flatten)]
    pub anime: Anime,
    /// Views in the current week; zero when the list fell back to all-time ranking.
    pub weekly_views: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewCount {
    pub total: i64,
    pub weekly: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_round_trips_through_its_identifier() {
        for avatar in Avatar::ALL {
            assert_eq!(avatar.as_str().parse::<Avatar>().unwrap(), avatar);
        }
        assert!("dragon".parse::<Avatar>().is_err());
        assert_eq!(Avatar::default(), Avatar::Default);
    }

    #[test]
    fn has_more_is_false_on_the_last_page() {
        assert!(CommentPage::new(vec![], 45, 2, 20).has_more);
        assert!(!CommentPage::new(vec![], 45, 3, 20).has_more);
        assert!(!CommentPage::new(vec![], 40, 2, 20).has_more);
        assert!(!CommentPage::new(vec![], 0, 1, 20).has_more);
        assert!(!CommentPage::new(vec![], 45, i64::MAX, 20).has_more);
    }

    #[test]
    fn threaded_comment_serializes_flat() {
        let comment = Comment {
            id: "c1".into(),
            anime_id: "one-piece".into(),
            episode_id: "1".into(),
            user_name: "alice".into(),
            user_avatar: Avatar::Fox,
            text: "hi".into(),
            timestamp: chrono::NaiveDate::from_ymd_opt(2024, 1, 7)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            likes: 2,
            parent_id: None,
            is_reply: false,
        };
        let json = serde_json::to_value(ThreadedComment {
            comment,
            replies: vec![],
        })
        .unwrap();
        assert_eq!(json["userAvatar"], "fox");
        assert_eq!(json["isReply"], false);
        assert_eq!(json["replies"].as_array().unwrap().len(), 0);
    }
}
