use anyhow::Context;
use chrono::NaiveDateTime;
use domain::{Comment, ModerationLog, Post};
use sqlx::FromRow;

#[derive(FromRow)]
pub struct SqlPost {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author_id: String,
    pub comment_count: i64,
    pub created_at: NaiveDateTime,
}

impl From<SqlPost> for Post {
    fn from(sql: SqlPost) -> Self {
        Post {
            id: sql.id,
            title: sql.title,
            body: sql.body,
            author_id: sql.author_id,
            comment_count: sql.comment_count,
            created_at: sql.created_at,
        }
    }
}

#[derive(FromRow)]
pub struct SqlComment {
    pub id: String,
    pub body: String,
    pub author_id: String,
    pub post_id: String,
    pub parent_comment_id: Option<String>,
    // JSON array column, decoded in try_into
    pub ancestors: String,
    pub is_edited: bool,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<SqlComment> for Comment {
    type Error = anyhow::Error;

    fn try_from(sql: SqlComment) -> anyhow::Result<Self> {
        let ancestors: Vec<String> = serde_json::from_str(&sql.ancestors)
            .with_context(|| format!("corrupt ancestors column on comment {}", sql.id))?;
        Ok(Comment {
            id: sql.id,
            body: sql.body,
            author_id: sql.author_id,
            post_id: sql.post_id,
            parent_comment_id: sql.parent_comment_id,
            ancestors,
            is_edited: sql.is_edited,
            is_deleted: sql.is_deleted,
            created_at: sql.created_at,
            updated_at: sql.updated_at,
        })
    }
}

#[derive(FromRow)]
pub struct SqlModerationLog {
    pub id: String,
    pub moderator_id: String,
    pub action: String,
    pub target_type: String,
    pub target_id: String,
    pub reason: String,
    pub metadata: String,
    pub created_at: NaiveDateTime,
    // LEFT JOIN against the profile cache
    pub moderator_name: Option<String>,
}

impl TryFrom<SqlModerationLog> for ModerationLog {
    type Error = anyhow::Error;

    fn try_from(sql: SqlModerationLog) -> anyhow::Result<Self> {
        let action = sql
            .action
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .with_context(|| format!("corrupt action column on log {}", sql.id))?;
        let target_type = sql
            .target_type
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .with_context(|| format!("corrupt target_type column on log {}", sql.id))?;
        let metadata = serde_json::from_str(&sql.metadata)
            .with_context(|| format!("corrupt metadata column on log {}", sql.id))?;
        Ok(ModerationLog {
            id: sql.id,
            moderator_id: sql.moderator_id,
            action,
            target_type,
            target_id: sql.target_id,
            reason: sql.reason,
            metadata,
            created_at: sql.created_at,
        })
    }
}
