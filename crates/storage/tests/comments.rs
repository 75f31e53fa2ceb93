mod common;

use common::{comment, input, memory_db, reply};
use domain::{Avatar, NewComment};
use storage::{CascadeSummary, StoreError};

#[tokio::test]
async fn add_comment_assigns_identity_and_defaults() {
    let db = memory_db().await;
    let new = NewComment::new("frieren", "3", "alice", Some("owl"), "  what a scene  ").unwrap();

    let c = db.add_comment(&new).await.unwrap();
    assert_eq!(c.id.len(), 32);
    assert_eq!(c.likes, 0);
    assert!(!c.is_reply);
    assert_eq!(c.parent_id, None);
    assert_eq!(c.text, "what a scene");
    assert_eq!(c.user_avatar, Avatar::Owl);

    let stored = db.get_comment_by_id(&c.id).await.unwrap().unwrap();
    assert_eq!(stored, c);
}

#[tokio::test]
async fn ids_are_never_reused() {
    let db = memory_db().await;
    let a = comment(&db, "frieren", "3", "alice", "one").await;
    db.delete_comment(&a.id).await.unwrap();
    let b = comment(&db, "frieren", "3", "alice", "one").await;
    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn get_missing_comment_is_none() {
    let db = memory_db().await;
    assert!(db.get_comment_by_id("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn reply_attaches_to_top_level_comment() {
    let db = memory_db().await;
    let parent = comment(&db, "frieren", "3", "alice", "first").await;
    let r = reply(&db, &parent, "bob", "agreed").await;

    assert!(r.is_reply);
    assert_eq!(r.parent_id.as_deref(), Some(parent.id.as_str()));
    let stored = db.get_comment_by_id(&r.id).await.unwrap().unwrap();
    assert!(stored.is_reply);
}

#[tokio::test]
async fn reply_to_missing_parent_is_not_found() {
    let db = memory_db().await;
    let err = db
        .add_reply("missing", &input("frieren", "3", "bob", "hello?"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn reply_to_a_reply_is_rejected() {
    let db = memory_db().await;
    let parent = comment(&db, "frieren", "3", "alice", "first").await;
    let r = reply(&db, &parent, "bob", "agreed").await;

    let err = db
        .add_reply(&r.id, &input("frieren", "3", "carol", "deeper"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert_eq!(db.get_comments_by_user("carol").await.unwrap().len(), 0);
}

#[tokio::test]
async fn reply_must_stay_in_parent_episode() {
    let db = memory_db().await;
    let parent = comment(&db, "frieren", "3", "alice", "first").await;
    let err = db
        .add_reply(&parent.id, &input("frieren", "4", "bob", "wrong episode"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn delete_cascades_to_replies_and_likes() {
    let db = memory_db().await;
    let parent = comment(&db, "frieren", "3", "alice", "first").await;
    let r1 = reply(&db, &parent, "bob", "r1").await;
    let r2 = reply(&db, &parent, "carol", "r2").await;
    let sibling = comment(&db, "frieren", "3", "dave", "untouched").await;

    for user in ["u1", "u2", "u3"] {
        assert!(db.like_comment(&parent.id, user).await.unwrap());
    }
    assert!(db.like_comment(&r1.id, "u1").await.unwrap());
    assert!(db.like_comment(&r2.id, "u2").await.unwrap());
    assert!(db.like_comment(&sibling.id, "u1").await.unwrap());

    let summary = db.delete_comment(&parent.id).await.unwrap();
    assert_eq!(summary, CascadeSummary { replies: 2, likes: 5 });

    for id in [&parent.id, &r1.id, &r2.id] {
        assert!(db.get_comment_by_id(id).await.unwrap().is_none());
        assert_eq!(db.count_comment_likes(id).await.unwrap(), 0);
    }

    let sibling = db.get_comment_by_id(&sibling.id).await.unwrap().unwrap();
    assert_eq!(sibling.likes, 1);
    assert_eq!(db.count_comment_likes(&sibling.id).await.unwrap(), 1);
    assert!(db.like_counter_drift().await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_a_reply_leaves_the_parent() {
    let db = memory_db().await;
    let parent = comment(&db, "frieren", "3", "alice", "first").await;
    let r = reply(&db, &parent, "bob", "r1").await;
    db.like_comment(&r.id, "alice").await.unwrap();

    let summary = db.delete_comment(&r.id).await.unwrap();
    assert_eq!(summary, CascadeSummary { replies: 0, likes: 1 });
    assert!(db.get_comment_by_id(&parent.id).await.unwrap().is_some());
}

#[tokio::test]
async fn delete_missing_comment_is_not_found() {
    let db = memory_db().await;
    let err = db.delete_comment("missing").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound("comment")));
}

#[tokio::test]
async fn comments_by_user_are_newest_first_across_episodes() {
    let db = memory_db().await;
    let a = comment(&db, "frieren", "1", "alice", "a").await;
    let other = comment(&db, "frieren", "1", "bob", "b").await;
    let b = comment(&db, "bocchi", "7", "alice", "c").await;
    let r = reply(&db, &other, "alice", "d").await;

    let mine = db.get_comments_by_user("alice").await.unwrap();
    let ids: Vec<_> = mine.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec![r.id.as_str(), b.id.as_str(), a.id.as_str()]);
}
