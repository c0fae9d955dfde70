use chrono::Utc;
use domain::{ensure_valid_id, new_object_id, Error, Post, Result};
use storage::Db;

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub author_id: String,
}

/// Owns post records and their denormalized comment counter.
#[derive(Clone)]
pub struct PostStore {
    db: Db,
}

impl PostStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: NewPost) -> Result<Post> {
        if input.title.trim().is_empty() || input.body.trim().is_empty() {
            return Err(Error::Validation("title and body are required".into()));
        }

        let post = Post {
            id: new_object_id(),
            title: input.title,
            body: input.body,
            author_id: input.author_id,
            comment_count: 0,
            created_at: Utc::now().naive_utc(),
        };
        self.db.insert_post(&post).await?;
        Ok(post)
    }

    pub async fn get(&self, post_id: &str) -> Result<Post> {
        ensure_valid_id(post_id, "postId")?;
        self.db
            .get_post(post_id)
            .await?
            .ok_or(Error::NotFound("post"))
    }

    pub async fn list(&self) -> Result<Vec<Post>> {
        Ok(self.db.list_posts().await?)
    }
}
