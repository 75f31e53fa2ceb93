use chrono::{DateTime, Utc};
use domain::{week::week_start, PopularAnime, ViewCount};
use tracing::{debug, info};

use crate::{models::SqlPopularAnime, Db, StoreError, StoreResult};

impl Db {
    pub async fn increment_anime_views(&self, anime_id: &str) -> StoreResult<ViewCount> {
        self.increment_anime_views_at(anime_id, Utc::now()).await
    }

    pub async fn increment_anime_views_at(
        &self,
        anime_id: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<ViewCount> {
        let week = week_start(now, self.week_zone);
        let mut tx = self.pool.begin().await?;

        let total = sqlx::query_scalar::<_, i64>(
            "UPDATE animes SET view_count = view_count + 1 WHERE id = ? RETURNING view_count",
        )
        .bind(anime_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(total) = total else {
            return Err(StoreError::NotFound("anime"));
        };

        let weekly = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO weekly_views (anime_id, view_count, week_start_date, last_updated)
            VALUES (?, 1, ?, ?)
            ON CONFLICT(anime_id, week_start_date) DO UPDATE SET
                view_count = view_count + 1,
                last_updated = excluded.last_updated
            RETURNING view_count
            "#,
        )
        .bind(anime_id)
        .bind(week)
        .bind(now.naive_utc())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!("Views for {}: total={} weekly={}", anime_id, total, weekly);
        Ok(ViewCount { total, weekly })
    }

    pub async fn get_weekly_views(&self, anime_id: &str) -> StoreResult<i64> {
        self.get_weekly_views_at(anime_id, Utc::now()).await
    }

    pub async fn get_weekly_views_at(&self, anime_id: &str, now: DateTime<Utc>) -> StoreResult<i64> {
        let week = week_start(now, self.week_zone);
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT view_count FROM weekly_views WHERE anime_id = ? AND week_start_date = ?",
        )
        .bind(anime_id)
        .bind(week)
        .fetch_optional(&self.pool)
        .await?;

        Ok(count.unwrap_or(0))
    }

    pub async fn get_weekly_popular(&self, limit: i64) -> StoreResult<Vec<PopularAnime>> {
        self.get_weekly_popular_at(limit, Utc::now()).await
    }

    // 本周还没有数据时退回总播放量排序
    pub async fn get_weekly_popular_at(
        &self,
        limit: i64,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<PopularAnime>> {
        let week = week_start(now, self.week_zone);

        let weekly = sqlx::query_as::<_, SqlPopularAnime>(
            r#"
            SELECT a.id, a.title, a.image_url, a.view_count, w.view_count AS weekly_views
            FROM weekly_views w
            JOIN animes a ON a.id = w.anime_id
            WHERE w.week_start_date = ?
            ORDER BY w.view_count DESC, a.view_count DESC, a.id ASC
            LIMIT ?
            "#,
        )
        .bind(week)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        if !weekly.is_empty() {
            return Ok(weekly.into_iter().map(Into::into).collect());
        }

        debug!("No weekly views for week of {}, ranking by all-time views", week);
        let all_time = sqlx::query_as::<_, SqlPopularAnime>(
            r#"
            SELECT id, title, image_url, view_count, 0 AS weekly_views
            FROM animes
            ORDER BY view_count DESC, id ASC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(all_time.into_iter().map(Into::into).collect())
    }

    pub async fn reset_weekly_views(&self) -> StoreResult<u64> {
        self.reset_weekly_views_at(Utc::now()).await
    }

    pub async fn reset_weekly_views_at(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        let week = week_start(now, self.week_zone);
        let purged = sqlx::query("DELETE FROM weekly_views WHERE week_start_date != ?")
            .bind(week)
            .execute(&self.pool)
            .await?
            .rows_affected();

        info!("Weekly views reset: kept week of {}, purged {} rows", week, purged);
        Ok(purged)
    }
}
