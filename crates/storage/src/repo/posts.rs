use crate::{models::SqlPost, Db};
use domain::Post;

impl Db {
    pub async fn insert_post(&self, post: &Post) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, title, body, author_id, comment_count, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.id)
        .bind(&post.title)
        .bind(&post.body)
        .bind(&post.author_id)
        .bind(post.comment_count)
        .bind(post.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_post(&self, post_id: &str) -> anyhow::Result<Option<Post>> {
        let row = sqlx::query_as::<_, SqlPost>(
            r#"
            SELECT id, title, body, author_id, comment_count, created_at
            FROM posts
            WHERE id = ?
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn list_posts(&self) -> anyhow::Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, SqlPost>(
            r#"
            SELECT id, title, body, author_id, comment_count, created_at
            FROM posts
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
