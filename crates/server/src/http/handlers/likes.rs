use axum::{
    extract::{Path, Query, State},
    Json,
};
use domain::UserName;
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, http::params::UserQuery, identity::user_token, state::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub user_name: String,
}

#[derive(Serialize)]
pub struct LikeResponse {
    /// False when the request was a no-op (already liked / not liked).
    pub changed: bool,
    pub likes: i64,
}

async fn current_likes(state: &AppState, id: &str) -> Result<i64, ApiError> {
    state
        .db
        .get_comment_by_id(id)
        .await?
        .map(|c| c.likes)
        .ok_or(ApiError::NotFound("comment"))
}

pub async fn like_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<LikeRequest>,
) -> Result<Json<LikeResponse>, ApiError> {
    let user_name = UserName::new(payload.user_name)?;
    let token = user_token(&state.identity_salt, &user_name);

    let changed = state.db.like_comment(&id, &token).await?;
    let likes = current_likes(&state, &id).await?;
    Ok(Json(LikeResponse { changed, likes }))
}

pub async fn unlike_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<LikeRequest>,
) -> Result<Json<LikeResponse>, ApiError> {
    let user_name = UserName::new(payload.user_name)?;
    let token = user_token(&state.identity_salt, &user_name);

    let changed = state.db.unlike_comment(&id, &token).await?;
    let likes = current_likes(&state, &id).await?;
    Ok(Json(LikeResponse { changed, likes }))
}

pub async fn like_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_name = UserName::new(query.user_name.unwrap_or_default())?;
    let token = user_token(&state.identity_salt, &user_name);

    let liked = state.db.has_user_liked_comment(&id, &token).await?;
    Ok(Json(serde_json::json!({ "liked": liked })))
}
