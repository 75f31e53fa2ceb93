use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::models::Avatar;

pub const USER_NAME_MAX_CHARS: usize = 16;
pub const COMMENT_TEXT_MAX_CHARS: usize = 600;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("User name must not be empty.")]
    EmptyUserName,
    #[error("User name is too long (max 16 chars).")]
    UserNameTooLong,
    #[error("User name may only contain letters and digits.")]
    InvalidUserName,
    #[error("Comment text must not be empty.")]
    EmptyText,
    #[error("Comment text is too long (max 600 chars).")]
    TextTooLong,
    #[error("Unknown avatar: {0}")]
    UnknownAvatar(String),
    #[error("Unknown sort order: {0}")]
    UnknownSortOrder(String),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    pub fn new(s: impl Into<String>) -> Result<Self, ValidationError> {
        let s = s.into();
        if s.is_empty() {
            return Err(ValidationError::EmptyUserName);
        }
        if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValidationError::InvalidUserName);
        }
        if s.len() > USER_NAME_MAX_CHARS {
            return Err(ValidationError::UserNameTooLong);
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Comment body after sanitising: trimmed, control characters other than
/// newlines removed, 1..=600 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommentText(String);

impl CommentText {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let cleaned: String = raw
            .trim()
            .chars()
            .filter(|c| *c == '\n' || !c.is_control())
            .collect();
        let len = cleaned.chars().count();
        if len == 0 {
            return Err(ValidationError::EmptyText);
        }
        if len > COMMENT_TEXT_MAX_CHARS {
            return Err(ValidationError::TextTooLong);
        }
        Ok(Self(cleaned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Everything the repository needs to persist a comment or reply.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub anime_id: String,
    pub episode_id: String,
    pub user_name: UserName,
    pub user_avatar: Avatar,
    pub text: CommentText,
}

impl NewComment {
    pub fn new(
        anime_id: impl Into<String>,
        episode_id: impl Into<String>,
        user_name: &str,
        user_avatar: Option<&str>,
        text: &str,
    ) -> Result<Self, ValidationError> {
        let anime_id = anime_id.into();
        let episode_id = episode_id.into();
        if anime_id.trim().is_empty() {
            return Err(ValidationError::MissingField("animeId"));
        }
        if episode_id.trim().is_empty() {
            return Err(ValidationError::MissingField("episodeId"));
        }
        let user_avatar = match user_avatar {
            Some(a) if !a.is_empty() => a.parse()?,
            _ => Avatar::default(),
        };
        Ok(Self {
            anime_id,
            episode_id,
            user_name: UserName::new(user_name)?,
            user_avatar,
            text: CommentText::new(text)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_name_rules() {
        assert!(UserName::new("alice").is_ok());
        assert!(UserName::new("Neo2024").is_ok());
        assert!(UserName::new("abcdefghijklmnop").is_ok());
        assert_eq!(
            UserName::new("abcdefghijklmnopq"),
            Err(ValidationError::UserNameTooLong)
        );
        assert_eq!(
            UserName::new("john_doe"),
            Err(ValidationError::InvalidUserName)
        );
        assert_eq!(UserName::new("ünï"), Err(ValidationError::InvalidUserName));
        assert_eq!(UserName::new(""), Err(ValidationError::EmptyUserName));
    }

    #[test]
    fn text_length_is_counted_in_chars() {
        assert!(CommentText::new(&"a".repeat(600)).is_ok());
        assert_eq!(
            CommentText::new(&"a".repeat(601)),
            Err(ValidationError::TextTooLong)
        );
        // 600 multi-byte chars is still within the limit
        assert!(CommentText::new(&"あ".repeat(600)).is_ok());
        assert_eq!(CommentText::new("   \t "), Err(ValidationError::EmptyText));
    }

    #[test]
    fn text_is_sanitised() {
        let t = CommentText::new("  hello\u{0007}\nworld \r ").unwrap();
        assert_eq!(t.as_str(), "hello\nworld");
    }

    #[test]
    fn new_comment_defaults_avatar() {
        let c = NewComment::new("naruto", "12", "alice", None, "great episode").unwrap();
        assert_eq!(c.user_avatar, Avatar::Default);

        let c = NewComment::new("naruto", "12", "alice", Some("owl"), "hi").unwrap();
        assert_eq!(c.user_avatar, Avatar::Owl);

        assert!(matches!(
            NewComment::new("naruto", "12", "alice", Some("dragon"), "hi"),
            Err(ValidationError::UnknownAvatar(_))
        ));
        assert_eq!(
            NewComment::new("", "12", "alice", None, "hi").unwrap_err(),
            ValidationError::MissingField("animeId")
        );
    }
}
