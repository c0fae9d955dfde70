use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::{Comment, CommentWithReplies, Error, Identity, PageQuery, Paginated};
use engine::NewComment;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::http::{auth::AuthedUser, error::ApiError, handlers::refresh_profile};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub post_id: Option<String>,
    pub body: Option<String>,
    pub parent_comment_id: Option<String>,
}

#[derive(Deserialize)]
pub struct EditCommentRequest {
    pub body: Option<String>,
}

pub async fn create_comment(
    State(state): State<AppState>,
    AuthedUser(identity): AuthedUser,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let (post_id, body) = match (payload.post_id, payload.body) {
        (Some(p), Some(b)) => (p, b),
        _ => return Err(Error::Validation("postId and body are required".into()).into()),
    };

    refresh_profile(&state, &identity).await;

    let comment = state
        .comments
        .create(NewComment {
            post_id,
            body,
            author_id: identity.user_id,
            parent_comment_id: payload.parent_comment_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn list_top_level(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<CommentWithReplies>>, ApiError> {
    Ok(Json(state.comments.list_top_level(&post_id, page).await?))
}

pub async fn list_replies(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<CommentWithReplies>>, ApiError> {
    Ok(Json(state.comments.list_replies(&comment_id, page).await?))
}

/// Ownership gate shared by edit and soft delete: the comment must exist
/// and belong to the caller.
async fn ensure_owner(
    state: &AppState,
    comment_id: &str,
    identity: &Identity,
) -> Result<Comment, ApiError> {
    let comment = state.comments.get(comment_id).await?;
    if comment.author_id != identity.user_id {
        return Err(Error::Forbidden("not the comment owner".into()).into());
    }
    Ok(comment)
}

pub async fn edit_comment(
    State(state): State<AppState>,
    AuthedUser(identity): AuthedUser,
    Path(comment_id): Path<String>,
    Json(payload): Json<EditCommentRequest>,
) -> Result<Json<Comment>, ApiError> {
    let body = payload
        .body
        .ok_or_else(|| Error::Validation("body is required".into()))?;

    ensure_owner(&state, &comment_id, &identity).await?;
    let comment = state.comments.edit(&comment_id, &body).await?;
    Ok(Json(comment))
}

pub async fn soft_delete_comment(
    State(state): State<AppState>,
    AuthedUser(identity): AuthedUser,
    Path(comment_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    ensure_owner(&state, &comment_id, &identity).await?;
    state.comments.soft_delete(&comment_id).await?;
    Ok(Json(json!({ "message": "Comment soft-deleted" })))
}
