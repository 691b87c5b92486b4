//! Postgres-backed [`DurableStore`](super::DurableStore).
//!
//! Grounded on the upsert pattern in the original connection pool/migration
//! layer, adapted from SQLite to `sqlx::PgPool`. `upsert_score` is a single
//! `INSERT ... ON CONFLICT DO UPDATE` round trip, atomic per row under
//! Postgres's MVCC. `all_participants` left-joins the `users` table so a
//! participant with no directory entry still surfaces with an empty name.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::{DurableStore, Result, StoreError};
use crate::domain::ParticipantRecord;

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DurableStore for PostgresStore {
    async fn upsert_score(&self, user_id: &str, score: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO participants (user_id, score, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (user_id) DO UPDATE
                SET score = EXCLUDED.score, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(user_id)
        .bind(score)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }

    async fn all_participants(&self) -> Result<Vec<ParticipantRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT p.user_id, COALESCE(u.username, '') AS username, p.score
            FROM participants p
            LEFT JOIN users u ON u.user_id = p.user_id
            ORDER BY p.score DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| ParticipantRecord {
                user_id: row.get("user_id"),
                username: row.get("username"),
                score: row.get("score"),
            })
            .collect())
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(())
    }
}
