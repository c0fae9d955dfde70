use engine::{CommentEngine, ModerationEngine, PostStore};
use storage::Db;

#[derive(Clone)]
pub struct AppState {
    pub posts: PostStore,
    pub comments: CommentEngine,
    pub moderation: ModerationEngine,
    // kept for cross-cutting concerns (profile cache refresh)
    pub db: Db,
}
