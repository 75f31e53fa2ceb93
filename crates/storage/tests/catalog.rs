mod common;

use common::{memory_db, seed_anime};
use domain::Anime;
use storage::AnimeCatalog;

#[tokio::test]
async fn get_reads_through_and_caches() {
    let db = memory_db().await;
    seed_anime(&db, "frieren", 7).await;
    let catalog = AnimeCatalog::new(db);

    assert_eq!(catalog.cached_len(), 0);
    let anime = catalog.get("frieren").await.unwrap().unwrap();
    assert_eq!(anime.view_count, 7);
    assert_eq!(catalog.cached_len(), 1);

    assert!(catalog.get("missing").await.unwrap().is_none());
    assert_eq!(catalog.cached_len(), 1);
}

#[tokio::test]
async fn recording_a_view_invalidates_the_entry() {
    let db = memory_db().await;
    seed_anime(&db, "frieren", 7).await;
    let catalog = AnimeCatalog::new(db);

    catalog.get("frieren").await.unwrap();
    let count = catalog.record_view("frieren").await.unwrap();
    assert_eq!(count.total, 8);
    assert_eq!(catalog.cached_len(), 0);
    assert_eq!(catalog.get("frieren").await.unwrap().unwrap().view_count, 8);
}

#[tokio::test]
async fn reseeding_keeps_accumulated_views() {
    let db = memory_db().await;
    let catalog = AnimeCatalog::new(db);
    let seed = vec![Anime {
        id: "frieren".into(),
        title: "Frieren".into(),
        image_url: None,
        view_count: 3,
    }];

    catalog.seed(&seed).await.unwrap();
    catalog.record_view("frieren").await.unwrap();
    catalog.record_view("frieren").await.unwrap();
    catalog.seed(&seed).await.unwrap();

    let anime = catalog.get("frieren").await.unwrap().unwrap();
    assert_eq!(anime.view_count, 5);
    assert_eq!(catalog.db().list_anime().await.unwrap().len(), 1);
}
