//! Durable Store: the source of truth for participant scores.
//!
//! One row per participant, keyed by identifier. The write path upserts
//! through here before touching the ranking cache; the cache's lazy
//! backfill reads the whole table back out through here.

pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ParticipantRecord;

pub use postgres::PostgresStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("durable store unreachable: {0}")]
    Unavailable(String),

    #[error("durable store query failed: {0}")]
    Query(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Capability required by Score Ingestion and the Snapshot Reader's lazy
/// backfill. Implementations must make `upsert_score` atomic for a single
/// identifier; `all_participants` is only ever called during backfill and
/// its ordering is informational, since the cache re-derives rank on
/// insert.
#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn upsert_score(&self, user_id: &str, score: i64) -> Result<()>;

    async fn all_participants(&self) -> Result<Vec<ParticipantRecord>>;

    /// Cheap connectivity probe for the `/health` endpoint.
    async fn health_check(&self) -> Result<()>;
}
