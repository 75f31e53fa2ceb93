use domain::{Anime, ViewCount};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

use crate::{Db, StoreResult};

/// Read-through cache over the `animes` table.
///
/// Writes that change a cached field go through here so the entry is
/// dropped after the write commits. A load that raced with an invalidation
/// is not cached.
#[derive(Clone)]
pub struct AnimeCatalog {
    db: Db,
    entries: Arc<RwLock<HashMap<String, Anime>>>,
    generation: Arc<AtomicU64>,
}

impl AnimeCatalog {
    pub fn new(db: Db) -> Self {
        Self {
            db,
            entries: Arc::new(RwLock::new(HashMap::new())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<Anime>> {
        {
            let map = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(anime) = map.get(id) {
                return Ok(Some(anime.clone()));
            }
        }

        let seen = self.generation.load(Ordering::Acquire);
        let loaded = self.db.get_anime(id).await?;
        if let Some(anime) = &loaded {
            let mut map = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            if self.generation.load(Ordering::Acquire) == seen {
                map.insert(anime.id.clone(), anime.clone());
            }
        }
        Ok(loaded)
    }

    pub async fn record_view(&self, id: &str) -> StoreResult<ViewCount> {
        let count = self.db.increment_anime_views(id).await?;
        self.invalidate(id);
        Ok(count)
    }

    pub async fn seed(&self, animes: &[Anime]) -> StoreResult<usize> {
        for anime in animes {
            self.db.upsert_anime(anime).await?;
            self.invalidate(&anime.id);
        }
        debug!("Catalog seeded with {} entries", animes.len());
        Ok(animes.len())
    }

    pub fn invalidate(&self, id: &str) {
        let mut map = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        self.generation.fetch_add(1, Ordering::AcqRel);
        map.remove(id);
    }

    pub fn cached_len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
