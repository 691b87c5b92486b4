//! Score Ingestion: `SubmitScore`, the sole write path into the system.
//!
//! The durable store is the only dependency whose failure is fatal to the
//! call. Everything downstream of it — cache, rank lookup, directory,
//! broadcast — degrades silently: a subscriber missing one delta is
//! preferable to a write failing because a cache happened to be down.

use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use crate::bus::BroadcastBus;
use crate::cache::RankingCache;
use crate::directory::UserDirectory;
use crate::domain::RankingEntry;
use crate::store::{DurableStore, StoreError};

use super::broadcaster::DeltaBroadcaster;

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("score must be non-negative")]
    InvalidScore,

    #[error("durable store rejected the write: {0}")]
    Store(#[from] StoreError),
}

pub struct ScoreIngestion {
    store: Arc<dyn DurableStore>,
    cache: Arc<dyn RankingCache>,
    bus: Arc<dyn BroadcastBus>,
    directory: Arc<dyn UserDirectory>,
    broadcaster: DeltaBroadcaster,
    max_broadcast_rank: u64,
}

impl ScoreIngestion {
    pub fn new(
        store: Arc<dyn DurableStore>,
        cache: Arc<dyn RankingCache>,
        bus: Arc<dyn BroadcastBus>,
        directory: Arc<dyn UserDirectory>,
        max_broadcast_rank: u64,
    ) -> Self {
        Self {
            store,
            cache,
            bus,
            directory,
            broadcaster: DeltaBroadcaster,
            max_broadcast_rank,
        }
    }

    pub async fn submit_score(&self, user_id: &str, score: i64) -> Result<(), IngestionError> {
        if score < 0 {
            return Err(IngestionError::InvalidScore);
        }

        self.store.upsert_score(user_id, score).await?;

        if let Err(e) = self.cache.update_score(user_id, score).await {
            warn!(error = %e, user_id, "ranking cache update failed; durable write already landed");
            return Ok(());
        }

        let rank = match self.cache.get_user_rank(user_id).await {
            Ok(Some(rank)) => rank,
            Ok(None) => {
                warn!(user_id, "rank lookup returned nothing immediately after update");
                return Ok(());
            }
            Err(e) => {
                warn!(error = %e, user_id, "rank lookup failed after score update");
                return Ok(());
            }
        };

        if rank > self.max_broadcast_rank {
            return Ok(());
        }

        let username = match self.directory.get_by_ids(std::slice::from_ref(&user_id.to_string())).await {
            Ok(mut names) => names.remove(user_id).unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, user_id, "directory lookup failed; broadcasting delta with an empty name");
                String::new()
            }
        };

        let delta = RankingEntry {
            user_id: user_id.to_string(),
            username,
            score,
            rank,
        };

        if let Err(e) = self.broadcaster.publish(self.bus.as_ref(), &delta).await {
            warn!(error = %e, user_id, "broadcast publish failed");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FailingCache, FailingStore, InMemoryBus, InMemoryCache, InMemoryDirectory, InMemoryStore};

    fn ingestion(
        store: Arc<dyn DurableStore>,
        cache: Arc<dyn RankingCache>,
        bus: Arc<dyn BroadcastBus>,
        directory: Arc<dyn UserDirectory>,
    ) -> ScoreIngestion {
        ScoreIngestion::new(store, cache, bus, directory, 1000)
    }

    #[tokio::test]
    async fn negative_score_is_rejected_before_touching_storage() {
        let store = Arc::new(InMemoryStore::new());
        let svc = ingestion(
            store.clone(),
            Arc::new(InMemoryCache::new()),
            Arc::new(InMemoryBus::new()),
            Arc::new(InMemoryDirectory::new()),
        );

        let err = svc.submit_score("u1", -1).await.unwrap_err();
        assert!(matches!(err, IngestionError::InvalidScore));
        assert!(!store.contains("u1"));
    }

    #[tokio::test]
    async fn durable_store_failure_propagates() {
        let svc = ingestion(
            Arc::new(FailingStore),
            Arc::new(InMemoryCache::new()),
            Arc::new(InMemoryBus::new()),
            Arc::new(InMemoryDirectory::new()),
        );

        let err = svc.submit_score("u1", 10).await.unwrap_err();
        assert!(matches!(err, IngestionError::Store(_)));
    }

    #[tokio::test]
    async fn cache_failure_is_swallowed_after_a_successful_durable_write() {
        let store = Arc::new(InMemoryStore::new());
        let svc = ingestion(
            store.clone(),
            Arc::new(FailingCache),
            Arc::new(InMemoryBus::new()),
            Arc::new(InMemoryDirectory::new()),
        );

        svc.submit_score("u1", 500).await.unwrap();
        assert_eq!(store.score_of("u1"), Some(500));
    }

    #[tokio::test]
    async fn within_horizon_update_is_broadcast_with_directory_name() {
        let directory = Arc::new(InMemoryDirectory::new());
        directory.set("u1", "alice");

        let bus = Arc::new(InMemoryBus::new());
        let mut stream = bus.subscribe(crate::bus::VIEWER_UPDATES_TOPIC).await.unwrap();

        let svc = ingestion(
            Arc::new(InMemoryStore::new()),
            Arc::new(InMemoryCache::new()),
            bus,
            directory,
        );

        svc.submit_score("u1", 777).await.unwrap();

        use futures::StreamExt;
        let payload = stream.next().await.unwrap();
        let delta = DeltaBroadcaster::decode(&payload).unwrap();
        assert_eq!(delta.user_id, "u1");
        assert_eq!(delta.username, "alice");
        assert_eq!(delta.score, 777);
        assert_eq!(delta.rank, 1);
    }

    #[tokio::test]
    async fn beyond_horizon_update_is_not_broadcast() {
        let cache = Arc::new(InMemoryCache::new());
        // Fill the cache with 5 participants ranked above the soon-to-arrive one.
        for i in 0..5 {
            cache.update_score(&format!("existing-{i}"), 10_000 - i).await.unwrap();
        }

        let bus = Arc::new(InMemoryBus::new());
        let mut stream = bus.subscribe(crate::bus::VIEWER_UPDATES_TOPIC).await.unwrap();

        let svc = ScoreIngestion::new(
            Arc::new(InMemoryStore::new()),
            cache,
            bus,
            Arc::new(InMemoryDirectory::new()),
            3, // max_broadcast_rank
        );

        svc.submit_score("latecomer", 1).await.unwrap();

        use futures::future::select;
        use futures::StreamExt;
        use std::time::Duration;

        let timeout = tokio::time::sleep(Duration::from_millis(50));
        tokio::pin!(timeout);
        let next = stream.next();
        tokio::pin!(next);

        match select(next, timeout).await {
            futures::future::Either::Left((Some(_), _)) => panic!("delta beyond horizon should not broadcast"),
            _ => {}
        }
    }
}
