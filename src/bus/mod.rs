//! Broadcast Bus: fire-and-forget pub/sub fan-out for score deltas.
//!
//! At-most-once-per-instance delivery, no cross-publisher ordering
//! guarantee. The reference implementation rides Redis Pub/Sub, which
//! gives cross-instance fan-out for free: every process subscribed to a
//! channel receives every message published to it, regardless of which
//! process published.

pub mod redis;

use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

pub use self::redis::RedisBroadcastBus;

/// Canonical topic for Score Update Deltas.
pub const VIEWER_UPDATES_TOPIC: &str = "leaderboard:viewer:updates";

#[derive(Debug, Error)]
pub enum BusError {
    #[error("broadcast bus unreachable: {0}")]
    Unavailable(String),

    #[error("broadcast bus operation failed: {0}")]
    Operation(String),
}

pub type Result<T> = std::result::Result<T, BusError>;

/// A stream of raw payloads delivered to one subscriber. Dropping the
/// stream releases the subscriber's connection and implicitly unsubscribes.
pub type PayloadStream = BoxStream<'static, Vec<u8>>;

#[async_trait]
pub trait BroadcastBus: Send + Sync {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()>;

    async fn subscribe(&self, topic: &str) -> Result<PayloadStream>;

    /// Cheap connectivity probe for the `/health` endpoint.
    async fn health_check(&self) -> Result<()>;
}
