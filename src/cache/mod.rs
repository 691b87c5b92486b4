//! Ranking Cache: an ordered view of every participant, keyed by score.
//!
//! Any structure offering O(log N) upsert-by-key and O(log N + M)
//! range-by-rank reads satisfies the contract; the reference
//! implementation below is a Redis sorted set, whose single-threaded
//! command execution gives per-operation atomicity for free.

pub mod redis;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::RankingEntry;

pub use redis::RedisRankingCache;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("ranking cache unreachable: {0}")]
    Unavailable(String),

    #[error("ranking cache operation failed: {0}")]
    Operation(String),
}

pub type Result<T> = std::result::Result<T, CacheError>;

/// The ordered-set contract described by the component design: upsert by
/// key, range by rank, total cardinality, and rank lookup by key. All four
/// operations are atomic with respect to concurrent callers; the cache
/// owns its own concurrency.
#[async_trait]
pub trait RankingCache: Send + Sync {
    /// Upsert a participant's score. Idempotent, no notification side effect.
    async fn update_score(&self, user_id: &str, score: i64) -> Result<()>;

    /// Participants ordered by score descending, `offset`-based, with rank
    /// already populated as `offset + i + 1` (1-indexed).
    async fn get_range(&self, limit: u32, offset: u64) -> Result<Vec<RankingEntry>>;

    /// Total number of participants currently tracked.
    async fn get_total(&self) -> Result<u64>;

    /// 1-indexed rank under the same descending-by-score order used by
    /// `get_range`, or `None` if the user is not present.
    async fn get_user_rank(&self, user_id: &str) -> Result<Option<u64>>;

    /// Cheap connectivity probe for the `/health` endpoint.
    async fn health_check(&self) -> Result<()>;
}
