use chrono::NaiveDateTime;
use domain::{Anime, Comment, PopularAnime};
use sqlx::FromRow;

pub(crate) const COMMENT_SELECT: &str = r#"
    SELECT id, anime_id, episode_id, user_name, user_avatar, text,
           created_at, likes, parent_id, is_reply
    FROM comments
"#;

#[derive(FromRow)]
pub struct SqlComment {
    pub id: String,
    pub anime_id: String,
    pub episode_id: String,
    pub user_name: String,
    pub user_avatar: String,
    pub text: String,
    pub created_at: NaiveDateTime,
    pub likes: i64,
    pub parent_id: Option<String>,
    pub is_reply: bool,
}

impl From<SqlComment> for Comment {
    fn from(sql: SqlComment) -> Self {
        Comment {
            id: sql.id,
            anime_id: sql.anime_id,
            episode_id: sql.episode_id,
            user_name: sql.user_name,
            // 旧数据里可能存在已下线的头像
            user_avatar: sql.user_avatar.parse().unwrap_or_default(),
            text: sql.text,
            timestamp: sql.created_at,
            likes: sql.likes,
            parent_id: sql.parent_id,
            is_reply: sql.is_reply,
        }
    }
}

#[derive(FromRow)]
pub struct SqlAnime {
    pub id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub view_count: i64,
}

impl From<SqlAnime> for Anime {
    fn from(sql: SqlAnime) -> Self {
        Anime {
            id: sql.id,
            title: sql.title,
            image_url: sql.image_url,
            view_count: sql.view_count,
        }
    }
}

#[derive(FromRow)]
pub struct SqlPopularAnime {
    pub id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub view_count: i64,
    pub weekly_views: i64,
}

impl From<SqlPopularAnime> for PopularAnime {
    fn from(sql: SqlPopularAnime) -> Self {
        PopularAnime {
            anime: Anime {
                id: sql.id,
                title: sql.title,
                image_url: sql.image_url,
                view_count: sql.view_count,
            },
            weekly_views: sql.weekly_views,
        }
    }
}
