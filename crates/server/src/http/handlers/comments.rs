use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use domain::{Comment, CommentPage, NewComment, UserName};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::admin::is_admin;
use crate::{
    error::ApiError,
    http::params::{PageQuery, UserQuery},
    identity::user_token,
    state::AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub anime_id: String,
    pub episode_id: String,
    pub user_name: String,
    pub user_avatar: Option<String>,
    pub text: String,
    pub parent_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPageResponse {
    #[serde(flatten)]
    pub page: CommentPage,
    /// Ids on this page (comments and replies) liked by `userName`.
    pub liked_ids: Vec<String>,
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path((anime_id, episode_id)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> Result<Json<CommentPageResponse>, ApiError> {
    let req = query.normalize(state.pagination);
    let page = state
        .db
        .get_comment_page(&anime_id, &episode_id, req.page, req.limit, req.sort)
        .await?;

    let viewer = query
        .user_name
        .as_deref()
        .and_then(|name| UserName::new(name).ok());
    let liked_ids = match viewer {
        Some(name) => {
            let ids: Vec<String> = page
                .comments
                .iter()
                .flat_map(|t| std::iter::once(&t.comment).chain(t.replies.iter()))
                .map(|c| c.id.clone())
                .collect();
            let token = user_token(&state.identity_salt, &name);
            let mut liked: Vec<String> = state
                .db
                .liked_comment_ids(&token, &ids)
                .await?
                .into_iter()
                .collect();
            liked.sort();
            liked
        }
        None => Vec::new(),
    };

    Ok(Json(CommentPageResponse { page, liked_ids }))
}

pub async fn post_comment(
    State(state): State<AppState>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let new = NewComment::new(
        payload.anime_id,
        payload.episode_id,
        &payload.user_name,
        payload.user_avatar.as_deref(),
        &payload.text,
    )
    .map_err(|e| {
        warn!("Rejected comment from {:?}: {}", payload.user_name, e);
        ApiError::from(e)
    })?;

    if state.catalog.get(&new.anime_id).await?.is_none() {
        return Err(ApiError::NotFound("anime"));
    }

    let comment = match payload.parent_id.as_deref() {
        Some(parent_id) if !parent_id.is_empty() => state.db.add_reply(parent_id, &new).await?,
        _ => state.db.add_comment(&new).await?,
    };

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Comment>, ApiError> {
    state
        .db
        .get_comment_by_id(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("comment"))
}

/// Authors may delete their own comments; the admin token may delete any.
pub async fn delete_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<StatusCode, ApiError> {
    let comment = state
        .db
        .get_comment_by_id(&id)
        .await?
        .ok_or(ApiError::NotFound("comment"))?;

    if !is_admin(&headers, &state.admin_token) {
        // userName 由客户端自行声明，未经认证；只用于防误删，不是权限边界
        let user_name = query.user_name.ok_or(ApiError::Unauthorized)?;
        if user_name != comment.user_name {
            return Err(ApiError::Forbidden("Only the author can delete this comment"));
        }
    }

    let summary = state.db.delete_comment(&id).await?;
    info!(
        "Comment {} on {}/{} removed ({} replies, {} likes)",
        id, comment.anime_id, comment.episode_id, summary.replies, summary.likes
    );
    Ok(StatusCode::NO_CONTENT)
}

pub async fn user_comments(
    State(state): State<AppState>,
    Path(user_name): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let user_name = UserName::new(user_name)?;
    let comments = state.db.get_comments_by_user(user_name.as_str()).await?;
    Ok(Json(comments))
}
