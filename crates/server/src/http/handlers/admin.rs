use axum::{extract::State, http::HeaderMap, Json};
use serde_json::{json, Value};

use crate::{error::ApiError, state::AppState};

/// Checks the `Authorization: Bearer <admin_token>` header.
pub fn require_admin(headers: &HeaderMap, admin_token: &str) -> Result<(), ApiError> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;
    let expected_token = format!("Bearer {}", admin_token);
    if auth_header != expected_token {
        return Err(ApiError::Forbidden("Invalid Admin Token"));
    }
    Ok(())
}

pub fn is_admin(headers: &HeaderMap, admin_token: &str) -> bool {
    require_admin(headers, admin_token).is_ok()
}

pub async fn reset_weekly_views(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    require_admin(&headers, &state.admin_token)?;

    let purged = state.db.reset_weekly_views().await?;
    Ok(Json(json!({ "purged": purged })))
}
