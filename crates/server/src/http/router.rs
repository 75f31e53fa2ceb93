use super::handlers::{admin, comments, likes, views};
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

const METHODS: [Method; 3] = [Method::GET, Method::POST, Method::DELETE];

pub fn build_router(state: AppState, allowed_origins: &str) -> Router {
    let cors = if allowed_origins == "*" {
        CorsLayer::new()
            .allow_methods(METHODS)
            .allow_origin(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<HeaderValue>().ok())
            .collect();

        if origins.is_empty() {
            tracing::warn!("CORS config is invalid or empty, falling back to allow ANY.");
            CorsLayer::new()
                .allow_methods(METHODS)
                .allow_origin(Any)
                .allow_headers(Any)
        } else {
            tracing::info!("CORS enabled for origins: {:?}", origins);
            CorsLayer::new()
                .allow_methods(METHODS)
                .allow_origin(origins)
                .allow_headers(Any)
        }
    };

    Router::new()
        .route("/api/anime/:anime_id", get(views::get_anime))
        .route("/api/anime/:anime_id/views", post(views::record_view))
        .route(
            "/api/anime/:anime_id/episodes/:episode_id/comments",
            get(comments::list_comments),
        )
        .route("/api/popular/weekly", get(views::weekly_popular))
        .route("/api/comments", post(comments::post_comment))
        .route(
            "/api/comments/:id",
            get(comments::get_comment).delete(comments::delete_comment),
        )
        .route(
            "/api/comments/:id/like",
            get(likes::like_status)
                .post(likes::like_comment)
                .delete(likes::unlike_comment),
        )
        .route("/api/users/:user_name/comments", get(comments::user_comments))
        .route(
            "/api/admin/weekly-views/reset",
            post(admin::reset_weekly_views),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
