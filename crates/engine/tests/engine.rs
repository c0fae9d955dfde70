use domain::{
    Error, Identity, ModerationAction, PageQuery, Role, DELETED_PLACEHOLDER, RESTORED_PLACEHOLDER,
};
use engine::{CommentEngine, ModerationEngine, NewComment, NewPost, PostStore};
use storage::Db;

async fn setup() -> (Db, PostStore, CommentEngine, ModerationEngine) {
    let db = Db::new("sqlite::memory:").await.expect("in-memory db");
    (
        db.clone(),
        PostStore::new(db.clone()),
        CommentEngine::new(db.clone()),
        ModerationEngine::new(db),
    )
}

fn moderator() -> Identity {
    Identity {
        user_id: "feedfacefeedfacefeedface".into(),
        role: Role::Moderator,
        display_name: Some("mira".into()),
    }
}

fn author_id() -> String {
    "0123456789abcdef01234567".into()
}

async fn make_post(posts: &PostStore) -> String {
    posts
        .create(NewPost {
            title: "First post".into(),
            body: "hello".into(),
            author_id: author_id(),
        })
        .await
        .unwrap()
        .id
}

async fn make_comment(
    comments: &CommentEngine,
    post_id: &str,
    body: &str,
    parent: Option<&str>,
) -> domain::Comment {
    comments
        .create(NewComment {
            post_id: post_id.into(),
            body: body.into(),
            author_id: author_id(),
            parent_comment_id: parent.map(str::to_string),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn top_level_comments_have_no_ancestors() {
    let (_db, posts, comments, _) = setup().await;
    let post_id = make_post(&posts).await;

    let c = make_comment(&comments, &post_id, "top", None).await;
    assert!(c.ancestors.is_empty());
    assert_eq!(c.parent_comment_id, None);
    assert!(!c.is_edited);
    assert!(!c.is_deleted);
}

#[tokio::test]
async fn reply_ancestors_extend_parent_chain() {
    let (_db, posts, comments, _) = setup().await;
    let post_id = make_post(&posts).await;

    let root = make_comment(&comments, &post_id, "root", None).await;
    let child = make_comment(&comments, &post_id, "child", Some(&root.id)).await;
    let grandchild = make_comment(&comments, &post_id, "grandchild", Some(&child.id)).await;

    assert_eq!(child.ancestors, vec![root.id.clone()]);
    // ancestors(parent) ++ [parent.id], root first
    assert_eq!(grandchild.ancestors, vec![root.id.clone(), child.id.clone()]);
    assert_eq!(grandchild.parent_comment_id, Some(child.id));
}

#[tokio::test]
async fn comment_count_increments_for_replies_too() {
    let (_db, posts, comments, _) = setup().await;
    let post_id = make_post(&posts).await;

    let root = make_comment(&comments, &post_id, "root", None).await;
    make_comment(&comments, &post_id, "reply", Some(&root.id)).await;

    let post = posts.get(&post_id).await.unwrap();
    assert_eq!(post.comment_count, 2);
}

#[tokio::test]
async fn create_rejects_missing_references_and_bad_input() {
    let (_db, posts, comments, _) = setup().await;
    let post_id = make_post(&posts).await;

    let err = comments
        .create(NewComment {
            post_id: "deadbeefdeadbeefdeadbeef".into(),
            body: "orphan".into(),
            author_id: author_id(),
            parent_comment_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound("post")));

    let err = comments
        .create(NewComment {
            post_id: post_id.clone(),
            body: "reply".into(),
            author_id: author_id(),
            parent_comment_id: Some("deadbeefdeadbeefdeadbeef".into()),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound("parent comment")));

    let err = comments
        .create(NewComment {
            post_id: "not-an-id".into(),
            body: "x".into(),
            author_id: author_id(),
            parent_comment_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = comments
        .create(NewComment {
            post_id,
            body: "   ".into(),
            author_id: author_id(),
            parent_comment_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn top_level_listing_paginates_newest_first() {
    let (_db, posts, comments, _) = setup().await;
    let post_id = make_post(&posts).await;

    let mut ids = Vec::new();
    for i in 0..12 {
        ids.push(make_comment(&comments, &post_id, &format!("c{}", i), None).await.id);
    }

    let page1 = comments
        .list_top_level(&post_id, PageQuery::default())
        .await
        .unwrap();
    assert_eq!(page1.total, 12);
    assert_eq!(page1.limit, 10);
    assert_eq!(page1.total_pages, 2);
    assert_eq!(page1.items.len(), 10);
    // newest first: the last created comment leads
    assert_eq!(page1.items[0].comment.id, ids[11]);

    let page2 = comments
        .list_top_level(
            &post_id,
            PageQuery {
                page: Some(2),
                limit: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(page2.items.len(), 2);

    // every comment appears exactly once across pages
    let mut seen: Vec<String> = page1
        .items
        .iter()
        .chain(page2.items.iter())
        .map(|i| i.comment.id.clone())
        .collect();
    seen.sort();
    let mut expected = ids.clone();
    expected.sort();
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn top_level_listing_annotates_direct_reply_counts() {
    let (_db, posts, comments, _) = setup().await;
    let post_id = make_post(&posts).await;

    let c1 = make_comment(&comments, &post_id, "c1", None).await;
    let c2 = make_comment(&comments, &post_id, "c2", None).await;
    let r1 = make_comment(&comments, &post_id, "r1", Some(&c1.id)).await;
    make_comment(&comments, &post_id, "r2", Some(&c1.id)).await;
    // nested reply counts toward r1, not toward c1
    make_comment(&comments, &post_id, "nested", Some(&r1.id)).await;

    let page = comments
        .list_top_level(&post_id, PageQuery::default())
        .await
        .unwrap();
    assert_eq!(page.total, 2);

    let count_of = |id: &str| {
        page.items
            .iter()
            .find(|i| i.comment.id == id)
            .map(|i| i.reply_count)
            .unwrap()
    };
    assert_eq!(count_of(&c1.id), 2);
    assert_eq!(count_of(&c2.id), 0);
}

#[tokio::test]
async fn replies_list_oldest_first_with_child_counts() {
    let (_db, posts, comments, _) = setup().await;
    let post_id = make_post(&posts).await;

    let root = make_comment(&comments, &post_id, "root", None).await;
    let first = make_comment(&comments, &post_id, "first", Some(&root.id)).await;
    let second = make_comment(&comments, &post_id, "second", Some(&root.id)).await;
    make_comment(&comments, &post_id, "deep", Some(&second.id)).await;

    let page = comments
        .list_replies(&root.id, PageQuery::default())
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.limit, 5);
    // chronological reading order
    assert_eq!(page.items[0].comment.id, first.id);
    assert_eq!(page.items[1].comment.id, second.id);
    assert_eq!(page.items[0].reply_count, 0);
    assert_eq!(page.items[1].reply_count, 1);
}

#[tokio::test]
async fn replies_of_unknown_comment_are_an_empty_page() {
    let (_db, _posts, comments, _) = setup().await;

    let page = comments
        .list_replies("deadbeefdeadbeefdeadbeef", PageQuery::default())
        .await
        .unwrap();
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 1);
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn absurd_page_numbers_yield_an_empty_page() {
    let (_db, posts, comments, _) = setup().await;
    let post_id = make_post(&posts).await;
    make_comment(&comments, &post_id, "only", None).await;

    let page = comments
        .list_top_level(
            &post_id,
            PageQuery {
                page: Some(i64::MAX),
                limit: Some(100),
            },
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.page, i64::MAX);
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn listing_is_idempotent_without_writes() {
    let (_db, posts, comments, _) = setup().await;
    let post_id = make_post(&posts).await;
    let root = make_comment(&comments, &post_id, "root", None).await;
    make_comment(&comments, &post_id, "reply", Some(&root.id)).await;

    let a = comments
        .list_top_level(&post_id, PageQuery::default())
        .await
        .unwrap();
    let b = comments
        .list_top_level(&post_id, PageQuery::default())
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_value(&a).unwrap(),
        serde_json::to_value(&b).unwrap()
    );
}

#[tokio::test]
async fn edit_overwrites_body_and_marks_edited() {
    let (_db, posts, comments, _) = setup().await;
    let post_id = make_post(&posts).await;
    let c = make_comment(&comments, &post_id, "draft", None).await;

    let edited = comments.edit(&c.id, "final").await.unwrap();
    assert_eq!(edited.body, "final");
    assert!(edited.is_edited);

    let fetched = comments.get(&c.id).await.unwrap();
    assert_eq!(fetched.body, "final");
    assert!(fetched.is_edited);

    let err = comments
        .edit("deadbeefdeadbeefdeadbeef", "x")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound("comment")));
}

#[tokio::test]
async fn soft_delete_replaces_body_with_placeholder() {
    let (_db, posts, comments, _) = setup().await;
    let post_id = make_post(&posts).await;
    let c = make_comment(&comments, &post_id, "rude words", None).await;

    comments.soft_delete(&c.id).await.unwrap();

    let fetched = comments.get(&c.id).await.unwrap();
    assert!(fetched.is_deleted);
    assert_eq!(fetched.body, DELETED_PLACEHOLDER);
}

#[tokio::test]
async fn restore_reverses_soft_delete_and_logs() {
    let (_db, posts, comments, moderation) = setup().await;
    let post_id = make_post(&posts).await;
    let c = make_comment(&comments, &post_id, "original", None).await;

    comments.soft_delete(&c.id).await.unwrap();
    let log = moderation
        .restore(&c.id, &moderator(), None, Some("hi".into()))
        .await
        .unwrap();

    assert_eq!(log.action, ModerationAction::Restore);
    assert_eq!(log.target_id, c.id);
    assert_eq!(log.metadata["restoredBody"], "hi");

    let fetched = comments.get(&c.id).await.unwrap();
    assert!(!fetched.is_deleted);
    assert_eq!(fetched.body, "hi");
}

#[tokio::test]
async fn restore_without_body_uses_placeholder() {
    let (_db, posts, comments, moderation) = setup().await;
    let post_id = make_post(&posts).await;
    let c = make_comment(&comments, &post_id, "original", None).await;

    comments.soft_delete(&c.id).await.unwrap();
    moderation
        .restore(&c.id, &moderator(), None, None)
        .await
        .unwrap();

    let fetched = comments.get(&c.id).await.unwrap();
    assert_eq!(fetched.body, RESTORED_PLACEHOLDER);
}

#[tokio::test]
async fn restore_of_active_comment_fails_without_logging() {
    let (_db, posts, comments, moderation) = setup().await;
    let post_id = make_post(&posts).await;
    let c = make_comment(&comments, &post_id, "still here", None).await;

    let err = moderation
        .restore(&c.id, &moderator(), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidState(_)));

    let logs = moderation.list_logs(PageQuery::default()).await.unwrap();
    assert_eq!(logs.total, 0);
}

#[tokio::test]
async fn hard_delete_snapshots_then_destroys() {
    let (_db, posts, comments, moderation) = setup().await;
    let post_id = make_post(&posts).await;
    let root = make_comment(&comments, &post_id, "root", None).await;
    let c = make_comment(&comments, &post_id, "spam spam", Some(&root.id)).await;

    let log = moderation
        .hard_delete(&c.id, &moderator(), Some("spam".into()))
        .await
        .unwrap();

    assert_eq!(log.action, ModerationAction::HardDelete);
    assert_eq!(log.target_id, c.id);
    assert_eq!(log.reason, "spam");
    assert_eq!(log.metadata["body"], "spam spam");
    assert_eq!(log.metadata["authorId"], author_id());
    assert_eq!(log.metadata["postId"], post_id);
    assert_eq!(log.metadata["ancestors"][0], root.id);

    // destroyed is terminal
    let err = comments.get(&c.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound("comment")));
    let err = moderation
        .restore(&c.id, &moderator(), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound("comment")));
}

// Known discrepancy carried over from the moderation design: destroying a
// comment does not decrement the post's denormalized counter.
#[tokio::test]
async fn hard_delete_leaves_comment_count_untouched() {
    let (_db, posts, comments, moderation) = setup().await;
    let post_id = make_post(&posts).await;
    let c = make_comment(&comments, &post_id, "doomed", None).await;
    assert_eq!(posts.get(&post_id).await.unwrap().comment_count, 1);

    moderation
        .hard_delete(&c.id, &moderator(), None)
        .await
        .unwrap();

    assert_eq!(posts.get(&post_id).await.unwrap().comment_count, 1);
}

#[tokio::test]
async fn soft_deleted_then_hard_deleted_logs_the_placeholder() {
    let (_db, posts, comments, moderation) = setup().await;
    let post_id = make_post(&posts).await;
    let c = make_comment(&comments, &post_id, "lost forever", None).await;

    comments.soft_delete(&c.id).await.unwrap();
    let log = moderation
        .hard_delete(&c.id, &moderator(), None)
        .await
        .unwrap();

    // the original text was already gone when the snapshot was taken
    assert_eq!(log.metadata["body"], DELETED_PLACEHOLDER);
}

#[tokio::test]
async fn logs_list_newest_first_with_moderator_names() {
    let (db, posts, comments, moderation) = setup().await;
    let post_id = make_post(&posts).await;
    let c1 = make_comment(&comments, &post_id, "one", None).await;
    let c2 = make_comment(&comments, &post_id, "two", None).await;

    let m = moderator();
    db.upsert_profile(&m.user_id, m.display_name.as_deref())
        .await
        .unwrap();

    moderation
        .hard_delete(&c1.id, &m, Some("first".into()))
        .await
        .unwrap();
    moderation
        .hard_delete(&c2.id, &m, Some("second".into()))
        .await
        .unwrap();

    let page = moderation.list_logs(PageQuery::default()).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.limit, 20);
    assert_eq!(page.items[0].log.reason, "second");
    assert_eq!(page.items[1].log.reason, "first");
    assert_eq!(page.items[0].moderator_name.as_deref(), Some("mira"));
}

#[tokio::test]
async fn log_pagination_clamps_like_comment_listing() {
    let (_db, posts, comments, moderation) = setup().await;
    let post_id = make_post(&posts).await;
    for i in 0..3 {
        let c = make_comment(&comments, &post_id, &format!("c{}", i), None).await;
        moderation
            .hard_delete(&c.id, &moderator(), None)
            .await
            .unwrap();
    }

    let page = moderation
        .list_logs(PageQuery {
            page: Some(0),
            limit: Some(2),
        })
        .await
        .unwrap();
    assert_eq!(page.page, 1);
    assert_eq!(page.total, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn posts_require_title_and_body() {
    let (_db, posts, _, _) = setup().await;
    let err = posts
        .create(NewPost {
            title: "".into(),
            body: "b".into(),
            author_id: author_id(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = posts.get("deadbeefdeadbeefdeadbeef").await.unwrap_err();
    assert!(matches!(err, Error::NotFound("post")));
}

#[tokio::test]
async fn posts_list_newest_first() {
    let (_db, posts, _, _) = setup().await;
    for i in 0..3 {
        posts
            .create(NewPost {
                title: format!("post {}", i),
                body: "b".into(),
                author_id: author_id(),
            })
            .await
            .unwrap();
    }
    let all = posts.list().await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].title, "post 2");
    assert_eq!(all[2].title, "post 0");
}
