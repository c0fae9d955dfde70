use chrono::Utc;
use domain::{
    ensure_valid_id, new_object_id, Comment, CommentWithReplies, Error, PageQuery, Paginated,
    Result, DELETED_PLACEHOLDER,
};
use storage::Db;

const DEFAULT_TOP_LEVEL_LIMIT: i64 = 10;
const DEFAULT_REPLIES_LIMIT: i64 = 5;

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: String,
    pub body: String,
    pub author_id: String,
    pub parent_comment_id: Option<String>,
}

/// Comment creation, ancestor-chain maintenance and paginated tree reads.
///
/// Authorization (ownership, roles) is the caller's concern: every operation
/// here trusts a pre-verified identity context.
#[derive(Clone)]
pub struct CommentEngine {
    db: Db,
}

impl CommentEngine {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Create a top-level comment or a reply.
    ///
    /// A reply's ancestor chain is its parent's chain plus the parent id,
    /// computed here once and never touched again. The insert and the post
    /// counter increment commit atomically in storage.
    pub async fn create(&self, input: NewComment) -> Result<Comment> {
        if input.body.trim().is_empty() {
            return Err(Error::Validation("postId and body are required".into()));
        }
        ensure_valid_id(&input.post_id, "postId")?;

        self.db
            .get_post(&input.post_id)
            .await?
            .ok_or(Error::NotFound("post"))?;

        let ancestors = match &input.parent_comment_id {
            Some(parent_id) => {
                ensure_valid_id(parent_id, "parentCommentId")?;
                let parent = self
                    .db
                    .get_comment(parent_id)
                    .await?
                    .ok_or(Error::NotFound("parent comment"))?;
                let mut chain = parent.ancestors;
                chain.push(parent.id);
                chain
            }
            None => Vec::new(),
        };

        let now = Utc::now().naive_utc();
        let comment = Comment {
            id: new_object_id(),
            body: input.body,
            author_id: input.author_id,
            post_id: input.post_id,
            parent_comment_id: input.parent_comment_id,
            ancestors,
            is_edited: false,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        self.db.insert_comment(&comment).await?;
        Ok(comment)
    }

    /// Newest-first top-level comments for a post, each annotated with its
    /// direct reply count via one grouped query over the page's id set.
    pub async fn list_top_level(
        &self,
        post_id: &str,
        page: PageQuery,
    ) -> Result<Paginated<CommentWithReplies>> {
        ensure_valid_id(post_id, "postId")?;
        let (page, limit, offset) = page.normalize(DEFAULT_TOP_LEVEL_LIMIT);

        let total = self.db.count_top_level(post_id).await?;
        let comments = self.db.list_top_level(post_id, limit, offset).await?;
        let items = self.annotate(comments).await?;

        Ok(Paginated::new(total, page, limit, items))
    }

    /// Oldest-first immediate replies of a comment, each annotated with its
    /// own child count. An unknown (but well-formed) id yields an empty page.
    pub async fn list_replies(
        &self,
        comment_id: &str,
        page: PageQuery,
    ) -> Result<Paginated<CommentWithReplies>> {
        ensure_valid_id(comment_id, "commentId")?;
        let (page, limit, offset) = page.normalize(DEFAULT_REPLIES_LIMIT);

        let total = self.db.count_replies(comment_id).await?;
        let replies = self.db.list_replies(comment_id, limit, offset).await?;
        let items = self.annotate(replies).await?;

        Ok(Paginated::new(total, page, limit, items))
    }

    pub async fn get(&self, comment_id: &str) -> Result<Comment> {
        ensure_valid_id(comment_id, "commentId")?;
        self.db
            .get_comment(comment_id)
            .await?
            .ok_or(Error::NotFound("comment"))
    }

    /// Overwrite the body and mark the comment edited. Ownership must have
    /// been verified by the caller.
    pub async fn edit(&self, comment_id: &str, new_body: &str) -> Result<Comment> {
        if new_body.trim().is_empty() {
            return Err(Error::Validation("body is required".into()));
        }
        let comment = self.get(comment_id).await?;

        let now = Utc::now().naive_utc();
        self.db
            .update_comment_body(&comment.id, new_body, true, comment.is_deleted, now)
            .await?;

        Ok(Comment {
            body: new_body.to_string(),
            is_edited: true,
            updated_at: now,
            ..comment
        })
    }

    /// Replace the body with the deletion placeholder and flag the comment.
    /// The original text is not preserved anywhere; only a later hard delete
    /// snapshots what is left (the placeholder).
    pub async fn soft_delete(&self, comment_id: &str) -> Result<()> {
        let comment = self.get(comment_id).await?;

        let now = Utc::now().naive_utc();
        self.db
            .update_comment_body(
                &comment.id,
                DELETED_PLACEHOLDER,
                comment.is_edited,
                true,
                now,
            )
            .await?;
        Ok(())
    }

    async fn annotate(&self, comments: Vec<Comment>) -> Result<Vec<CommentWithReplies>> {
        let ids: Vec<String> = comments.iter().map(|c| c.id.clone()).collect();
        let mut counts = self.db.reply_counts(&ids).await?;

        Ok(comments
            .into_iter()
            .map(|comment| {
                let reply_count = counts.remove(&comment.id).unwrap_or(0);
                CommentWithReplies {
                    comment,
                    reply_count,
                }
            })
            .collect())
    }
}
