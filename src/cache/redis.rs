//! Redis sorted-set backed [`RankingCache`](super::RankingCache).
//!
//! Grounded on the `ZADD`/`ZSCORE`/`ZRANGE ... REV WITHSCORES` usage in the
//! pack's socket-leaderboard cache adapter, using the `AsyncCommands`
//! convenience trait against a cloned `ConnectionManager` the way the
//! teacher's multi-tier cache manager talks to its L3 Redis tier.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::{CacheError, RankingCache, Result};
use crate::domain::RankingEntry;

const GLOBAL_KEY: &str = "leaderboard:global";

pub struct RedisRankingCache {
    conn: ConnectionManager,
}

impl RedisRankingCache {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl RankingCache for RedisRankingCache {
    async fn update_score(&self, user_id: &str, score: i64) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.zadd::<_, _, _, ()>(GLOBAL_KEY, user_id, score)
            .await
            .map_err(|e| CacheError::Operation(format!("ZADD failed: {}", e)))?;

        Ok(())
    }

    async fn get_range(&self, limit: u32, offset: u64) -> Result<Vec<RankingEntry>> {
        let mut conn = self.conn.clone();
        let stop = offset + limit.max(1) as u64 - 1;

        let raw: Vec<(String, i64)> = conn
            .zrevrange_withscores(GLOBAL_KEY, offset as isize, stop as isize)
            .await
            .map_err(|e| CacheError::Operation(format!("ZREVRANGE failed: {}", e)))?;

        Ok(raw
            .into_iter()
            .enumerate()
            .map(|(i, (user_id, score))| RankingEntry {
                user_id,
                username: String::new(),
                score,
                rank: offset + i as u64 + 1,
            })
            .collect())
    }

    async fn get_total(&self) -> Result<u64> {
        let mut conn = self.conn.clone();
        let total: u64 = conn
            .zcard(GLOBAL_KEY)
            .await
            .map_err(|e| CacheError::Operation(format!("ZCARD failed: {}", e)))?;

        Ok(total)
    }

    async fn get_user_rank(&self, user_id: &str) -> Result<Option<u64>> {
        let mut conn = self.conn.clone();
        let rank: Option<u64> = conn
            .zrevrank(GLOBAL_KEY, user_id)
            .await
            .map_err(|e| CacheError::Operation(format!("ZREVRANK failed: {}", e)))?;

        Ok(rank.map(|r| r + 1))
    }

    async fn health_check(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_error_wraps_underlying_message() {
        let err = CacheError::Unavailable("refused".to_string());
        assert!(err.to_string().contains("refused"));
    }
}
