use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use domain::{is_valid_id, Identity, Role};

use super::error::ApiError;

/// Extractor for the verified identity injected by the upstream
/// authenticator: `x-user-id` (required, 24-hex), `x-user-role`
/// (defaults to `user`) and `x-user-name` (optional display name).
///
/// Routes that take this extractor reject unauthenticated requests
/// with 401 before any handler logic runs.
#[derive(Debug, Clone)]
pub struct AuthedUser(pub Identity);

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

pub fn identity_from_headers(headers: &HeaderMap) -> Result<Identity, String> {
    let user_id = header_str(headers, "x-user-id").ok_or("No identity provided")?;
    if !is_valid_id(user_id) {
        return Err(format!("Malformed user id: {:?}", user_id));
    }

    let role = match header_str(headers, "x-user-role") {
        Some(raw) => raw.parse::<Role>()?,
        None => Role::User,
    };

    Ok(Identity {
        user_id: user_id.to_string(),
        role,
        display_name: header_str(headers, "x-user-name").map(str::to_string),
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity_from_headers(&parts.headers)
            .map(AuthedUser)
            .map_err(ApiError::unauthorized)
    }
}
