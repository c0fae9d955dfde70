use chrono::Utc;
use domain::{
    ensure_valid_id, new_object_id, Error, Identity, LogEntry, ModerationAction, ModerationLog,
    PageQuery, Paginated, Result, TargetType, RESTORED_PLACEHOLDER,
};
use serde_json::json;
use storage::Db;
use tracing::info;

const DEFAULT_LOGS_LIMIT: i64 = 20;

/// Destructive and restorative moderation actions, each leaving an immutable
/// audit record. Role checks happen before these calls; the engine only
/// records who acted.
#[derive(Clone)]
pub struct ModerationEngine {
    db: Db,
}

impl ModerationEngine {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Permanently delete a comment, snapshotting its prior state into the
    /// audit trail first. Irreversible: nothing outside the log metadata
    /// survives. The post's comment_count is deliberately left as-is.
    pub async fn hard_delete(
        &self,
        comment_id: &str,
        moderator: &Identity,
        reason: Option<String>,
    ) -> Result<ModerationLog> {
        ensure_valid_id(comment_id, "commentId")?;
        let comment = self
            .db
            .get_comment(comment_id)
            .await?
            .ok_or(Error::NotFound("comment"))?;

        let metadata = json!({
            "body": comment.body,
            "authorId": comment.author_id,
            "postId": comment.post_id,
            "parentCommentId": comment.parent_comment_id,
            "ancestors": comment.ancestors,
            "createdAt": comment.created_at,
        });

        self.db.delete_comment(comment_id).await?;

        let log = ModerationLog {
            id: new_object_id(),
            moderator_id: moderator.user_id.clone(),
            action: ModerationAction::HardDelete,
            target_type: TargetType::Comment,
            target_id: comment_id.to_string(),
            reason: reason.unwrap_or_default(),
            metadata,
            created_at: Utc::now().naive_utc(),
        };
        self.db.insert_log(&log).await?;

        info!(
            comment_id,
            moderator = %moderator.user_id,
            "comment hard-deleted"
        );
        Ok(log)
    }

    /// Reverse a soft delete. The engine has no memory of the pre-delete
    /// text, so the body becomes `new_body` or the restored placeholder.
    /// Fails with `InvalidState` when the comment is not soft-deleted,
    /// without writing a log row.
    pub async fn restore(
        &self,
        comment_id: &str,
        moderator: &Identity,
        reason: Option<String>,
        new_body: Option<String>,
    ) -> Result<ModerationLog> {
        ensure_valid_id(comment_id, "commentId")?;
        let comment = self
            .db
            .get_comment(comment_id)
            .await?
            .ok_or(Error::NotFound("comment"))?;

        if !comment.is_deleted {
            return Err(Error::InvalidState("comment is not soft-deleted".into()));
        }

        let body = new_body.unwrap_or_else(|| RESTORED_PLACEHOLDER.to_string());
        let now = Utc::now().naive_utc();
        self.db
            .update_comment_body(&comment.id, &body, comment.is_edited, false, now)
            .await?;

        let log = ModerationLog {
            id: new_object_id(),
            moderator_id: moderator.user_id.clone(),
            action: ModerationAction::Restore,
            target_type: TargetType::Comment,
            target_id: comment_id.to_string(),
            reason: reason.unwrap_or_default(),
            metadata: json!({ "restoredBody": body }),
            created_at: now,
        };
        self.db.insert_log(&log).await?;

        info!(
            comment_id,
            moderator = %moderator.user_id,
            "comment restored"
        );
        Ok(log)
    }

    /// Newest-first audit trail with moderator display names joined in.
    pub async fn list_logs(&self, page: PageQuery) -> Result<Paginated<LogEntry>> {
        let (page, limit, offset) = page.normalize(DEFAULT_LOGS_LIMIT);

        let total = self.db.count_logs().await?;
        let items = self.db.list_logs(limit, offset).await?;

        Ok(Paginated::new(total, page, limit, items))
    }
}
