//! In-memory fakes for the four storage/bus traits, used by unit tests
//! throughout the crate and by the black-box integration test in
//! `tests/`. Gated behind the `test-support` feature rather than
//! `#[cfg(test)]` so integration tests (compiled as a separate crate)
//! can depend on it too.

use async_trait::async_trait;
use futures::stream;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::bus::{BroadcastBus, BusError, PayloadStream};
use crate::cache::{CacheError, RankingCache};
use crate::directory::{DirectoryError, UserDirectory};
use crate::domain::{ParticipantRecord, RankingEntry};
use crate::store::{DurableStore, StoreError};

#[derive(Default)]
pub struct InMemoryStore {
    rows: Mutex<HashMap<String, i64>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.rows.lock().contains_key(user_id)
    }

    pub fn score_of(&self, user_id: &str) -> Option<i64> {
        self.rows.lock().get(user_id).copied()
    }
}

#[async_trait]
impl DurableStore for InMemoryStore {
    async fn upsert_score(&self, user_id: &str, score: i64) -> Result<(), StoreError> {
        self.rows.lock().insert(user_id.to_string(), score);
        Ok(())
    }

    async fn all_participants(&self) -> Result<Vec<ParticipantRecord>, StoreError> {
        let mut rows: Vec<ParticipantRecord> = self
            .rows
            .lock()
            .iter()
            .map(|(user_id, score)| ParticipantRecord {
                user_id: user_id.clone(),
                username: String::new(),
                score: *score,
            })
            .collect();

        rows.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(rows)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// A store whose `upsert_score` always fails, for testing the non-fatal
/// cache-failure / fatal durable-failure propagation split.
pub struct FailingStore;

#[async_trait]
impl DurableStore for FailingStore {
    async fn upsert_score(&self, _user_id: &str, _score: i64) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("simulated outage".to_string()))
    }

    async fn all_participants(&self) -> Result<Vec<ParticipantRecord>, StoreError> {
        Err(StoreError::Unavailable("simulated outage".to_string()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("simulated outage".to_string()))
    }
}

#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, i64>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(&self) -> Vec<(String, i64)> {
        let mut v: Vec<(String, i64)> = self
            .entries
            .lock()
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        v.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        v
    }
}

#[async_trait]
impl RankingCache for InMemoryCache {
    async fn update_score(&self, user_id: &str, score: i64) -> Result<(), CacheError> {
        self.entries.lock().insert(user_id.to_string(), score);
        Ok(())
    }

    async fn get_range(&self, limit: u32, offset: u64) -> Result<Vec<RankingEntry>, CacheError> {
        let sorted = self.sorted();
        Ok(sorted
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .enumerate()
            .map(|(i, (user_id, score))| RankingEntry {
                user_id,
                username: String::new(),
                score,
                rank: offset + i as u64 + 1,
            })
            .collect())
    }

    async fn get_total(&self) -> Result<u64, CacheError> {
        Ok(self.entries.lock().len() as u64)
    }

    async fn get_user_rank(&self, user_id: &str) -> Result<Option<u64>, CacheError> {
        let sorted = self.sorted();
        Ok(sorted
            .iter()
            .position(|(id, _)| id == user_id)
            .map(|pos| pos as u64 + 1))
    }

    async fn health_check(&self) -> Result<(), CacheError> {
        Ok(())
    }
}

/// A cache whose operations always fail, for testing the silent-degrade
/// paths on the write path.
pub struct FailingCache;

#[async_trait]
impl RankingCache for FailingCache {
    async fn update_score(&self, _user_id: &str, _score: i64) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("simulated outage".to_string()))
    }

    async fn get_range(&self, _limit: u32, _offset: u64) -> Result<Vec<RankingEntry>, CacheError> {
        Err(CacheError::Unavailable("simulated outage".to_string()))
    }

    async fn get_total(&self) -> Result<u64, CacheError> {
        Err(CacheError::Unavailable("simulated outage".to_string()))
    }

    async fn get_user_rank(&self, _user_id: &str) -> Result<Option<u64>, CacheError> {
        Err(CacheError::Unavailable("simulated outage".to_string()))
    }

    async fn health_check(&self) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("simulated outage".to_string()))
    }
}

/// In-process broadcast bus backed by a `tokio::sync::broadcast` channel.
/// Single-topic: good enough for tests since the core only ever uses one
/// topic, `VIEWER_UPDATES_TOPIC`.
pub struct InMemoryBus {
    tx: tokio::sync::broadcast::Sender<Vec<u8>>,
}

impl InMemoryBus {
    pub fn new() -> Self {
        let (tx, _rx) = tokio::sync::broadcast::channel(256);
        Self { tx }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BroadcastBus for InMemoryBus {
    async fn publish(&self, _topic: &str, payload: Vec<u8>) -> Result<(), BusError> {
        // No receivers is not an error: fire-and-forget semantics.
        let _ = self.tx.send(payload);
        Ok(())
    }

    async fn subscribe(&self, _topic: &str) -> Result<PayloadStream, BusError> {
        let rx = self.tx.subscribe();
        let s = stream::unfold(rx, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(payload) => return Some((payload, rx)),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => return None,
                }
            }
        });
        Ok(Box::pin(s))
    }

    async fn health_check(&self) -> Result<(), BusError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryDirectory {
    names: Mutex<HashMap<String, String>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_names(names: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            names: Mutex::new(names.into_iter().collect()),
        }
    }

    pub fn set(&self, user_id: impl Into<String>, username: impl Into<String>) {
        self.names.lock().insert(user_id.into(), username.into());
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn get_by_ids(&self, user_ids: &[String]) -> Result<HashMap<String, String>, DirectoryError> {
        let names = self.names.lock();
        Ok(user_ids
            .iter()
            .filter_map(|id| names.get(id).map(|name| (id.clone(), name.clone())))
            .collect())
    }
}
