use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// HTTP wrapper for the engine error taxonomy. `Internal` is logged with
/// full context and the client only sees a generic message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }
}

impl From<domain::Error> for ApiError {
    fn from(err: domain::Error) -> Self {
        use domain::Error::*;
        match &err {
            Validation(_) => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            NotFound(_) => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            Forbidden(_) => Self {
                status: StatusCode::FORBIDDEN,
                message: err.to_string(),
            },
            InvalidState(_) => Self {
                status: StatusCode::CONFLICT,
                message: err.to_string(),
            },
            Internal(inner) => {
                tracing::error!("internal error: {:?}", inner);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Server error".to_string(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}
