//! Snapshot Reader: `GetPage`, the sole read path, plus the lazy backfill
//! it triggers when the ranking cache has nothing in it.

use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use crate::cache::{CacheError, RankingCache};
use crate::directory::UserDirectory;
use crate::domain::SnapshotPage;
use crate::store::DurableStore;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("limit must be between 1 and 100")]
    InvalidLimit,

    #[error("ranking cache rejected the read: {0}")]
    Cache(#[from] CacheError),
}

pub struct SnapshotReader {
    store: Arc<dyn DurableStore>,
    cache: Arc<dyn RankingCache>,
    directory: Arc<dyn UserDirectory>,
}

impl SnapshotReader {
    pub fn new(
        store: Arc<dyn DurableStore>,
        cache: Arc<dyn RankingCache>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            store,
            cache,
            directory,
        }
    }

    pub async fn get_page(&self, limit: u32, offset: u64) -> Result<SnapshotPage, SnapshotError> {
        if limit == 0 || limit > 100 {
            return Err(SnapshotError::InvalidLimit);
        }

        let mut total = self.cache.get_total().await?;

        if total == 0 {
            self.lazy_backfill().await;
            total = self.cache.get_total().await?;
        }

        let mut entries = self.cache.get_range(limit, offset).await?;

        let ids: Vec<String> = entries.iter().map(|e| e.user_id.clone()).collect();
        let names = self.directory.get_by_ids(&ids).await.unwrap_or_default();

        for entry in &mut entries {
            entry.username = names.get(&entry.user_id).cloned().unwrap_or_default();
        }

        Ok(SnapshotPage { entries, total })
    }

    async fn lazy_backfill(&self) {
        let participants = match self.store.all_participants().await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "lazy backfill aborted: durable store read failed");
                return;
            }
        };

        for participant in participants {
            if let Err(e) = self.cache.update_score(&participant.user_id, participant.score).await {
                warn!(error = %e, user_id = %participant.user_id, "backfill cache update failed for one entry");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{InMemoryCache, InMemoryDirectory, InMemoryStore};

    #[tokio::test]
    async fn rejects_limit_out_of_range() {
        let reader = SnapshotReader::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(InMemoryCache::new()),
            Arc::new(InMemoryDirectory::new()),
        );

        assert!(matches!(reader.get_page(0, 0).await, Err(SnapshotError::InvalidLimit)));
        assert!(matches!(reader.get_page(101, 0).await, Err(SnapshotError::InvalidLimit)));
    }

    #[tokio::test]
    async fn empty_cache_triggers_backfill_from_store() {
        let store = Arc::new(InMemoryStore::new());
        store.upsert_score("u1", 300).await.unwrap();
        store.upsert_score("u2", 900).await.unwrap();

        let directory = Arc::new(InMemoryDirectory::new());
        directory.set("u1", "alice");
        directory.set("u2", "bob");

        let reader = SnapshotReader::new(store, Arc::new(InMemoryCache::new()), directory);

        let page = reader.get_page(10, 0).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.entries[0].user_id, "u2");
        assert_eq!(page.entries[0].username, "bob");
        assert_eq!(page.entries[0].rank, 1);
        assert_eq!(page.entries[1].username, "alice");
    }

    #[tokio::test]
    async fn warm_cache_is_not_backfilled_again() {
        let store = Arc::new(InMemoryStore::new());
        let cache = Arc::new(InMemoryCache::new());
        cache.update_score("u1", 50).await.unwrap();

        let reader = SnapshotReader::new(store.clone(), cache, Arc::new(InMemoryDirectory::new()));

        let page = reader.get_page(10, 0).await.unwrap();
        assert_eq!(page.total, 1);
        // The store was never populated; if a backfill ran it would have found nothing anyway,
        // but this also confirms get_page didn't error trying to read an empty store.
        assert!(!store.contains("u1"));
    }

    #[tokio::test]
    async fn missing_directory_entry_leaves_username_blank() {
        let cache = Arc::new(InMemoryCache::new());
        cache.update_score("ghost", 10).await.unwrap();

        let reader = SnapshotReader::new(
            Arc::new(InMemoryStore::new()),
            cache,
            Arc::new(InMemoryDirectory::new()),
        );

        let page = reader.get_page(10, 0).await.unwrap();
        assert_eq!(page.entries[0].username, "");
    }

    #[tokio::test]
    async fn pagination_offset_is_honored() {
        let cache = Arc::new(InMemoryCache::new());
        for i in 0..5 {
            cache.update_score(&format!("u{i}"), 100 - i as i64).await.unwrap();
        }

        let reader = SnapshotReader::new(
            Arc::new(InMemoryStore::new()),
            cache,
            Arc::new(InMemoryDirectory::new()),
        );

        let page = reader.get_page(2, 2).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.entries[0].rank, 3);
        assert_eq!(page.entries[0].user_id, "u2");
    }
}
