use axum::{
    extract::{Path, Query, State},
    Json,
};
use domain::{Error, Identity, LogEntry, ModerationLog, PageQuery, Paginated};
use serde::Deserialize;

use crate::http::{auth::AuthedUser, error::ApiError, handlers::refresh_profile};
use crate::state::AppState;

#[derive(Deserialize, Default)]
pub struct ModerationRequest {
    pub reason: Option<String>,
    // restore only: replacement body supplied by the moderator
    pub body: Option<String>,
}

/// Role gate for the whole moderation surface. The engines never check
/// roles themselves; this runs first in every handler here.
fn require_moderator(identity: &Identity) -> Result<(), ApiError> {
    if identity.role.can_moderate() {
        Ok(())
    } else {
        Err(Error::Forbidden("insufficient role".into()).into())
    }
}

pub async fn hard_delete_comment(
    State(state): State<AppState>,
    AuthedUser(identity): AuthedUser,
    Path(comment_id): Path<String>,
    payload: Option<Json<ModerationRequest>>,
) -> Result<Json<ModerationLog>, ApiError> {
    require_moderator(&identity)?;
    refresh_profile(&state, &identity).await;

    let reason = payload.and_then(|Json(p)| p.reason);
    let log = state
        .moderation
        .hard_delete(&comment_id, &identity, reason)
        .await?;
    Ok(Json(log))
}

pub async fn restore_comment(
    State(state): State<AppState>,
    AuthedUser(identity): AuthedUser,
    Path(comment_id): Path<String>,
    payload: Option<Json<ModerationRequest>>,
) -> Result<Json<ModerationLog>, ApiError> {
    require_moderator(&identity)?;
    refresh_profile(&state, &identity).await;

    let ModerationRequest { reason, body } = payload.map(|Json(p)| p).unwrap_or_default();
    let log = state
        .moderation
        .restore(&comment_id, &identity, reason, body)
        .await?;
    Ok(Json(log))
}

pub async fn list_logs(
    State(state): State<AppState>,
    AuthedUser(identity): AuthedUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<LogEntry>>, ApiError> {
    require_moderator(&identity)?;
    Ok(Json(state.moderation.list_logs(page).await?))
}
