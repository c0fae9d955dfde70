mod comments;
mod moderation;
mod posts;

pub use comments::{CommentEngine, NewComment};
pub use moderation::ModerationEngine;
pub use posts::{NewPost, PostStore};
