use chrono::Utc;
use domain::{Comment, NewComment};
use tracing::{debug, info};

use super::new_id;
use crate::{
    models::{SqlComment, COMMENT_SELECT},
    Db, StoreError, StoreResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CascadeSummary {
    pub replies: u64,
    pub likes: u64,
}

impl Db {
    pub async fn add_comment(&self, new: &NewComment) -> StoreResult<Comment> {
        let comment = Comment {
            id: new_id(),
            anime_id: new.anime_id.clone(),
            episode_id: new.episode_id.clone(),
            user_name: new.user_name.as_str().to_string(),
            user_avatar: new.user_avatar,
            text: new.text.as_str().to_string(),
            timestamp: Utc::now().naive_utc(),
            likes: 0,
            parent_id: None,
            is_reply: false,
        };

        sqlx::query(
            r#"
            INSERT INTO comments (
                id, anime_id, episode_id, user_name, user_avatar,
                text, created_at, likes, parent_id, is_reply
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, 0, NULL, FALSE)
            "#,
        )
        .bind(&comment.id)
        .bind(&comment.anime_id)
        .bind(&comment.episode_id)
        .bind(&comment.user_name)
        .bind(comment.user_avatar.as_str())
        .bind(&comment.text)
        .bind(comment.timestamp)
        .execute(&self.pool)
        .await?;

        debug!(
            "Comment {} added to {}/{} by {}",
            comment.id, comment.anime_id, comment.episode_id, comment.user_name
        );
        Ok(comment)
    }

    // 回复只能挂在同一集的顶层评论下
    pub async fn add_reply(&self, parent_id: &str, new: &NewComment) -> StoreResult<Comment> {
        let reply = Comment {
            id: new_id(),
            anime_id: new.anime_id.clone(),
            episode_id: new.episode_id.clone(),
            user_name: new.user_name.as_str().to_string(),
            user_avatar: new.user_avatar,
            text: new.text.as_str().to_string(),
            timestamp: Utc::now().naive_utc(),
            likes: 0,
            parent_id: Some(parent_id.to_string()),
            is_reply: true,
        };

        // 父评论校验与插入在同一条语句里完成
        let result = sqlx::query(
            r#"
            INSERT INTO comments (
                id, anime_id, episode_id, user_name, user_avatar,
                text, created_at, likes, parent_id, is_reply
            )
            SELECT ?, ?, ?, ?, ?, ?, ?, 0, p.id, TRUE
            FROM comments p
            WHERE p.id = ? AND p.is_reply = FALSE AND p.anime_id = ? AND p.episode_id = ?
            "#,
        )
        .bind(&reply.id)
        .bind(&reply.anime_id)
        .bind(&reply.episode_id)
        .bind(&reply.user_name)
        .bind(reply.user_avatar.as_str())
        .bind(&reply.text)
        .bind(reply.timestamp)
        .bind(parent_id)
        .bind(&reply.anime_id)
        .bind(&reply.episode_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("parent comment"));
        }

        debug!("Reply {} added under {}", reply.id, parent_id);
        Ok(reply)
    }

    pub async fn get_comment_by_id(&self, id: &str) -> StoreResult<Option<Comment>> {
        let row = sqlx::query_as::<_, SqlComment>(&format!("{COMMENT_SELECT} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    pub async fn delete_comment(&self, id: &str) -> StoreResult<CascadeSummary> {
        let mut tx = self.pool.begin().await?;

        // 1. 点赞记录 (本身 + 所有回复)
        let likes = sqlx::query(
            r#"
            DELETE FROM comment_likes
            WHERE comment_id = ?
               OR comment_id IN (SELECT id FROM comments WHERE parent_id = ?)
            "#,
        )
        .bind(id)
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        // 2. 回复
        let replies = sqlx::query("DELETE FROM comments WHERE parent_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        // 3. 评论本身
        let removed = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            // tx 在 drop 时回滚
            return Err(StoreError::NotFound("comment"));
        }

        tx.commit().await?;
        info!(
            "Comment {} deleted with {} replies and {} likes",
            id, replies, likes
        );
        Ok(CascadeSummary { replies, likes })
    }

    pub async fn get_comments_by_user(&self, user_name: &str) -> StoreResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, SqlComment>(&format!(
            "{COMMENT_SELECT} WHERE user_name = ? ORDER BY created_at DESC, rowid DESC"
        ))
        .bind(user_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
