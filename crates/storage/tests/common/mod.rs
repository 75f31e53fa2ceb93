#![allow(dead_code)]

use domain::{Anime, Comment, NewComment};
use storage::Db;
use tempfile::TempDir;

pub async fn memory_db() -> Db {
    Db::new("sqlite::memory:").await.unwrap()
}

/// File-backed database with a real connection pool, for concurrency tests.
/// Keep the returned `TempDir` alive for as long as the `Db` is used.
pub async fn file_db() -> (Db, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("engagement.db").display());
    let db = Db::connect(&url, 8).await.unwrap();
    (db, dir)
}

pub fn input(anime: &str, episode: &str, user: &str, text: &str) -> NewComment {
    NewComment::new(anime, episode, user, None, text).unwrap()
}

pub async fn comment(db: &Db, anime: &str, episode: &str, user: &str, text: &str) -> Comment {
    db.add_comment(&input(anime, episode, user, text))
        .await
        .unwrap()
}

pub async fn reply(db: &Db, parent: &Comment, user: &str, text: &str) -> Comment {
    db.add_reply(
        &parent.id,
        &input(&parent.anime_id, &parent.episode_id, user, text),
    )
    .await
    .unwrap()
}

pub async fn seed_anime(db: &Db, id: &str, view_count: i64) {
    db.upsert_anime(&Anime {
        id: id.to_string(),
        title: format!("Title of {}", id),
        image_url: None,
        view_count,
    })
    .await
    .unwrap();
}
