use domain::Anime;

use crate::{models::SqlAnime, Db, StoreResult};

impl Db {
    // 重复导入不会让 view_count 倒退
    pub async fn upsert_anime(&self, anime: &Anime) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO animes (id, title, image_url, view_count)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                image_url = excluded.image_url,
                view_count = MAX(animes.view_count, excluded.view_count)
            "#,
        )
        .bind(&anime.id)
        .bind(&anime.title)
        .bind(&anime.image_url)
        .bind(anime.view_count.max(0))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_anime(&self, id: &str) -> StoreResult<Option<Anime>> {
        let row = sqlx::query_as::<_, SqlAnime>(
            "SELECT id, title, image_url, view_count FROM animes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn list_anime(&self) -> StoreResult<Vec<Anime>> {
        let rows = sqlx::query_as::<_, SqlAnime>(
            "SELECT id, title, image_url, view_count FROM animes ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
