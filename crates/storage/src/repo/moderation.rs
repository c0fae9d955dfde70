use crate::{models::SqlModerationLog, Db};
use domain::{LogEntry, ModerationLog};
use sqlx::Row;

impl Db {
    /// The audit trail is append-only: this is the only statement that
    /// touches moderation_logs besides reads.
    pub async fn insert_log(&self, log: &ModerationLog) -> anyhow::Result<()> {
        let metadata = serde_json::to_string(&log.metadata)?;
        sqlx::query(
            r#"
            INSERT INTO moderation_logs (
                id, moderator_id, action, target_type, target_id,
                reason, metadata, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&log.id)
        .bind(&log.moderator_id)
        .bind(log.action.as_str())
        .bind(log.target_type.as_str())
        .bind(&log.target_id)
        .bind(&log.reason)
        .bind(metadata)
        .bind(log.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn count_logs(&self) -> anyhow::Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM moderation_logs")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }

    pub async fn list_logs(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<LogEntry>> {
        let rows = sqlx::query_as::<_, SqlModerationLog>(
            r#"
            SELECT
                l.id, l.moderator_id, l.action, l.target_type, l.target_id,
                l.reason, l.metadata, l.created_at,
                p.display_name AS moderator_name
            FROM moderation_logs l
            LEFT JOIN profiles p ON p.user_id = l.moderator_id
            ORDER BY l.created_at DESC, l.rowid DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|sql| {
                let moderator_name = sql.moderator_name.clone();
                Ok(LogEntry {
                    log: sql.try_into()?,
                    moderator_name,
                })
            })
            .collect()
    }
}
