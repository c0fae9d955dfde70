mod error;
mod ids;
mod models;
mod pagination;

pub use error::{Error, Result};
pub use ids::{ensure_valid_id, is_valid_id, new_object_id};
pub use models::{
    Comment, CommentWithReplies, Identity, LogEntry, ModerationAction, ModerationLog, Post, Role,
    TargetType, DELETED_PLACEHOLDER, RESTORED_PLACEHOLDER,
};
pub use pagination::{PageQuery, Paginated};
