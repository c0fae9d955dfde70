use crate::{models::SqlComment, Db};
use chrono::NaiveDateTime;
use domain::Comment;
use sqlx::{QueryBuilder, Row};
use std::collections::HashMap;

const COMMENT_COLUMNS: &str = "id, body, author_id, post_id, parent_comment_id, \
     ancestors, is_edited, is_deleted, created_at, updated_at";

impl Db {
    /// Insert a comment and bump the owning post's denormalized counter in
    /// one transaction, so a crash can never leave the pair half-applied.
    pub async fn insert_comment(&self, c: &Comment) -> anyhow::Result<()> {
        let ancestors = serde_json::to_string(&c.ancestors)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO comments (
                id, body, author_id, post_id, parent_comment_id,
                ancestors, is_edited, is_deleted, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&c.id)
        .bind(&c.body)
        .bind(&c.author_id)
        .bind(&c.post_id)
        .bind(&c.parent_comment_id)
        .bind(ancestors)
        .bind(c.is_edited)
        .bind(c.is_deleted)
        .bind(c.created_at)
        .bind(c.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE posts SET comment_count = comment_count + 1 WHERE id = ?")
            .bind(&c.post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn get_comment(&self, comment_id: &str) -> anyhow::Result<Option<Comment>> {
        let row = sqlx::query_as::<_, SqlComment>(&format!(
            "SELECT {} FROM comments WHERE id = ?",
            COMMENT_COLUMNS
        ))
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Comment::try_from).transpose()
    }

    pub async fn update_comment_body(
        &self,
        comment_id: &str,
        body: &str,
        is_edited: bool,
        is_deleted: bool,
        updated_at: NaiveDateTime,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE comments
            SET body = ?, is_edited = ?, is_deleted = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(body)
        .bind(is_edited)
        .bind(is_deleted)
        .bind(updated_at)
        .bind(comment_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Permanently remove a comment row. The post's comment_count is left
    /// untouched, matching the moderation semantics of the audit trail.
    pub async fn delete_comment(&self, comment_id: &str) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_top_level(&self, post_id: &str) -> anyhow::Result<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM comments WHERE post_id = ? AND parent_comment_id IS NULL",
        )
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get("count"))
    }

    pub async fn list_top_level(
        &self,
        post_id: &str,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, SqlComment>(&format!(
            r#"
            SELECT {}
            FROM comments
            WHERE post_id = ? AND parent_comment_id IS NULL
            ORDER BY created_at DESC, rowid DESC
            LIMIT ? OFFSET ?
            "#,
            COMMENT_COLUMNS
        ))
        .bind(post_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Comment::try_from).collect()
    }

    pub async fn count_replies(&self, parent_id: &str) -> anyhow::Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM comments WHERE parent_comment_id = ?")
            .bind(parent_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }

    pub async fn list_replies(
        &self,
        parent_id: &str,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, SqlComment>(&format!(
            r#"
            SELECT {}
            FROM comments
            WHERE parent_comment_id = ?
            ORDER BY created_at ASC, rowid ASC
            LIMIT ? OFFSET ?
            "#,
            COMMENT_COLUMNS
        ))
        .bind(parent_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Comment::try_from).collect()
    }

    /// Direct-reply counts for a set of parent ids in one grouped query,
    /// instead of a count per listed comment.
    pub async fn reply_counts(&self, parent_ids: &[String]) -> anyhow::Result<HashMap<String, i64>> {
        if parent_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut qb = QueryBuilder::new(
            "SELECT parent_comment_id, COUNT(*) AS reply_count \
             FROM comments WHERE parent_comment_id IN (",
        );
        let mut sep = qb.separated(", ");
        for id in parent_ids {
            sep.push_bind(id);
        }
        sep.push_unseparated(")");
        qb.push(" GROUP BY parent_comment_id");

        let rows = qb.build().fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.get("parent_comment_id"), row.get("reply_count")))
            .collect())
    }
}
