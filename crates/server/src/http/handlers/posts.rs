use axum::{extract::State, http::StatusCode, Json};
use domain::{Error, Post};
use engine::NewPost;
use serde::Deserialize;

use crate::http::{auth::AuthedUser, error::ApiError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

pub async fn create_post(
    State(state): State<AppState>,
    AuthedUser(identity): AuthedUser,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let (title, body) = match (payload.title, payload.body) {
        (Some(t), Some(b)) => (t, b),
        _ => return Err(Error::Validation("Title and body are required".into()).into()),
    };

    let post = state
        .posts
        .create(NewPost {
            title,
            body,
            author_id: identity.user_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    Ok(Json(state.posts.list().await?))
}
