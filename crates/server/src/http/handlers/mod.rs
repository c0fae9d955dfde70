pub mod comments;
pub mod moderation;
pub mod posts;

use crate::state::AppState;
use domain::Identity;

/// Best-effort refresh of the cached display name used when joining
/// moderator identity into log listings. Never fails the request.
pub(crate) async fn refresh_profile(state: &AppState, identity: &Identity) {
    if let Some(name) = &identity.display_name {
        if let Err(e) = state.db.upsert_profile(&identity.user_id, Some(name)).await {
            tracing::warn!("profile cache refresh failed: {:?}", e);
        }
    }
}
