use chrono::Utc;
use sqlx::{FromRow, QueryBuilder, Sqlite};
use std::collections::HashSet;
use tracing::debug;

use crate::{Db, StoreError, StoreResult};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct LikeDrift {
    pub comment_id: String,
    pub counter: i64,
    pub ledger: i64,
}

impl Db {
    pub async fn has_user_liked_comment(&self, comment_id: &str, user_id: &str) -> StoreResult<bool> {
        let liked = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM comment_likes WHERE comment_id = ? AND user_id = ?)",
        )
        .bind(comment_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(liked)
    }

    // 已经点过赞（包括并发请求抢先写入）时返回 false
    pub async fn like_comment(&self, comment_id: &str, user_id: &str) -> StoreResult<bool> {
        if self.has_user_liked_comment(comment_id, user_id).await? {
            return Ok(false);
        }

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO comment_likes (comment_id, user_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(comment_id)
        .bind(user_id)
        .bind(Utc::now().naive_utc())
        .execute(&mut *tx)
        .await
        .map_err(StoreError::from);

        match inserted {
            Ok(_) => {}
            Err(StoreError::Conflict) => {
                debug!("Duplicate like on {} by {} rolled back", comment_id, user_id);
                return Ok(false);
            }
            Err(StoreError::NotFound(_)) => return Err(StoreError::NotFound("comment")),
            Err(e) => return Err(e),
        }

        let updated = sqlx::query("UPDATE comments SET likes = likes + 1 WHERE id = ?")
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(StoreError::NotFound("comment"));
        }

        tx.commit().await?;
        Ok(true)
    }

    // 计数最少减到 0
    pub async fn unlike_comment(&self, comment_id: &str, user_id: &str) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM comment_likes WHERE comment_id = ? AND user_id = ?")
            .bind(comment_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE comments SET likes = MAX(likes - 1, 0) WHERE id = ?")
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    pub async fn liked_comment_ids(
        &self,
        user_id: &str,
        comment_ids: &[String],
    ) -> StoreResult<HashSet<String>> {
        if comment_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT comment_id FROM comment_likes WHERE user_id = ");
        qb.push_bind(user_id);
        qb.push(" AND comment_id IN (");
        let mut ids = qb.separated(", ");
        for id in comment_ids {
            ids.push_bind(id);
        }
        ids.push_unseparated(")");

        let liked = qb
            .build_query_scalar::<String>()
            .fetch_all(&self.pool)
            .await?;

        Ok(liked.into_iter().collect())
    }

    pub async fn count_comment_likes(&self, comment_id: &str) -> StoreResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM comment_likes WHERE comment_id = ?",
        )
        .bind(comment_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn like_counter_drift(&self) -> StoreResult<Vec<LikeDrift>> {
        let rows = sqlx::query_as::<_, LikeDrift>(
            r#"
            SELECT c.id AS comment_id, c.likes AS counter, COUNT(l.id) AS ledger
            FROM comments c
            LEFT JOIN comment_likes l ON l.comment_id = c.id
            GROUP BY c.id
            HAVING c.likes != COUNT(l.id)
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
