use axum::{
    extract::{Path, Query, State},
    Json,
};
use domain::{Anime, PopularAnime, ViewCount};
use storage::{AnimeCatalog, Db};

use crate::{error::ApiError, http::params::LimitQuery};

pub async fn get_anime(
    State(catalog): State<AnimeCatalog>,
    Path(anime_id): Path<String>,
) -> Result<Json<Anime>, ApiError> {
    catalog
        .get(&anime_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("anime"))
}

pub async fn record_view(
    State(catalog): State<AnimeCatalog>,
    Path(anime_id): Path<String>,
) -> Result<Json<ViewCount>, ApiError> {
    let count = catalog.record_view(&anime_id).await?;
    Ok(Json(count))
}

pub async fn weekly_popular(
    State(db): State<Db>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<PopularAnime>>, ApiError> {
    let popular = db.get_weekly_popular(query.popular_limit()).await?;
    Ok(Json(popular))
}
