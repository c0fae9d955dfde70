use super::handlers::{comments, moderation, posts};
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

pub fn build_router(state: AppState, allowed_origins: &str) -> Router {
    let cors = if allowed_origins == "*" {
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
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
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
                .allow_origin(Any)
                .allow_headers(Any)
        } else {
            tracing::info!("CORS enabled for origins: {:?}", origins);
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
                .allow_origin(origins)
                .allow_headers(Any)
        }
    };

    Router::new()
        .route("/api/posts", post(posts::create_post).get(posts::list_posts))
        .route("/api/comments", post(comments::create_comment))
        .route(
            "/api/comments/replies/:comment_id",
            get(comments::list_replies),
        )
        // GET here takes a post id; PATCH and DELETE take a comment id
        .route(
            "/api/comments/:id",
            get(comments::list_top_level)
                .patch(comments::edit_comment)
                .delete(comments::soft_delete_comment),
        )
        .route(
            "/api/moderation/comment/:id",
            delete(moderation::hard_delete_comment),
        )
        .route(
            "/api/moderation/comment/:id/restore",
            post(moderation::restore_comment),
        )
        .route("/api/moderation/logs", get(moderation::list_logs))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "ts": chrono::Utc::now().to_rfc3339() }))
}
