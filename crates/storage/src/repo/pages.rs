use domain::{Comment, CommentPage, SortOrder, ThreadedComment};
use sqlx::{QueryBuilder, Sqlite};
use std::collections::HashMap;

use crate::{
    models::{SqlComment, COMMENT_SELECT},
    Db, StoreResult,
};

fn order_clause(sort: SortOrder) -> &'static str {
    // rowid 作为最后的决胜字段，保证分页是全序
    match sort {
        SortOrder::Recent => "created_at DESC, rowid DESC",
        SortOrder::Likes => "likes DESC, created_at DESC, rowid DESC",
    }
}

impl Db {
    // page 从 1 开始
    pub async fn get_comments_by_episode(
        &self,
        anime_id: &str,
        episode_id: &str,
        page: i64,
        limit: i64,
        sort: SortOrder,
    ) -> StoreResult<Vec<ThreadedComment>> {
        debug_assert!(page > 0 && limit > 0);
        // 偏移量溢出 i64 时必然越过最后一页
        let Some(offset) = (page - 1).checked_mul(limit) else {
            return Ok(Vec::new());
        };

        let mut tx = self.pool.begin().await?;

        let parents: Vec<Comment> = sqlx::query_as::<_, SqlComment>(&format!(
            r#"{COMMENT_SELECT}
            WHERE anime_id = ? AND episode_id = ? AND is_reply = FALSE
            ORDER BY {}
            LIMIT ? OFFSET ?"#,
            order_clause(sort)
        ))
        .bind(anime_id)
        .bind(episode_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

        if parents.is_empty() {
            return Ok(Vec::new());
        }

        // 一次查询取回本页全部回复
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(COMMENT_SELECT);
        qb.push(" WHERE parent_id IN (");
        let mut ids = qb.separated(", ");
        for parent in &parents {
            ids.push_bind(parent.id.clone());
        }
        ids.push_unseparated(") ORDER BY created_at ASC, rowid ASC");

        let replies = qb
            .build_query_as::<SqlComment>()
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;

        let mut by_parent: HashMap<String, Vec<Comment>> = HashMap::new();
        for reply in replies {
            let reply: Comment = reply.into();
            if let Some(parent_id) = reply.parent_id.clone() {
                by_parent.entry(parent_id).or_default().push(reply);
            }
        }

        Ok(parents
            .into_iter()
            .map(|comment| ThreadedComment {
                replies: by_parent.remove(&comment.id).unwrap_or_default(),
                comment,
            })
            .collect())
    }

    pub async fn get_total_comments_count(&self, anime_id: &str, episode_id: &str) -> StoreResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM comments
            WHERE anime_id = ? AND episode_id = ? AND is_reply = FALSE
            "#,
        )
        .bind(anime_id)
        .bind(episode_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn get_comment_page(
        &self,
        anime_id: &str,
        episode_id: &str,
        page: i64,
        limit: i64,
        sort: SortOrder,
    ) -> StoreResult<CommentPage> {
        let comments = self
            .get_comments_by_episode(anime_id, episode_id, page, limit, sort)
            .await?;
        let total = self.get_total_comments_count(anime_id, episode_id).await?;

        Ok(CommentPage::new(comments, total, page, limit))
    }
}
