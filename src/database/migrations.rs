//! Schema migration system, trimmed from the teacher's version-tracked
//! migration manager down to what this service's two tables need: the
//! `Migration` trait, a SQL-backed implementation, and a manager that
//! tracks applied versions in a `_migrations` table and runs whatever
//! hasn't run yet. Rollback/reset/status reporting (present in the
//! teacher) aren't wired up anywhere in this service, so they're dropped
//! rather than carried as dead surface.

use crate::database::{DatabaseError, Result};
use chrono::Utc;
use parking_lot::RwLock;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

pub type MigrationVersion = i64;

#[async_trait::async_trait]
pub trait Migration: Send + Sync {
    fn version(&self) -> MigrationVersion;
    fn name(&self) -> &str;

    async fn up(&self, pool: &PgPool) -> Result<()>;
}

pub struct SqlMigration {
    version: MigrationVersion,
    name: String,
    up_sql: String,
}

impl SqlMigration {
    pub fn new(version: MigrationVersion, name: impl Into<String>, up_sql: impl Into<String>) -> Self {
        Self {
            version,
            name: name.into(),
            up_sql: up_sql.into(),
        }
    }
}

#[async_trait::async_trait]
impl Migration for SqlMigration {
    fn version(&self) -> MigrationVersion {
        self.version
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn up(&self, pool: &PgPool) -> Result<()> {
        sqlx::query(&self.up_sql)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::Migration(format!("migration {} failed: {e}", self.version)))?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct MigrationRecord {
    version: i64,
}

pub struct MigrationManager {
    pool: PgPool,
    migrations: Arc<RwLock<HashMap<MigrationVersion, Box<dyn Migration>>>>,
    applied: Arc<RwLock<Vec<MigrationVersion>>>,
}

impl MigrationManager {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            migrations: Arc::new(RwLock::new(HashMap::new())),
            applied: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::Migration(format!("failed to create migrations table: {e}")))?;

        self.load_applied().await
    }

    pub fn register<M: Migration + 'static>(&self, migration: M) {
        self.migrations.write().insert(migration.version(), Box::new(migration));
    }

    async fn load_applied(&self) -> Result<()> {
        let records: Vec<MigrationRecord> = sqlx::query_as("SELECT version FROM _migrations ORDER BY version")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::Migration(format!("failed to load migration history: {e}")))?;

        *self.applied.write() = records.into_iter().map(|r| r.version).collect();
        Ok(())
    }

    pub fn pending_migrations(&self) -> Vec<MigrationVersion> {
        let applied = self.applied.read();
        let mut pending: Vec<MigrationVersion> = self
            .migrations
            .read()
            .keys()
            .filter(|v| !applied.contains(v))
            .copied()
            .collect();

        pending.sort();
        pending
    }

    pub async fn run_pending(&self) -> Result<()> {
        let pending = self.pending_migrations();

        if pending.is_empty() {
            info!("no pending migrations");
            return Ok(());
        }

        info!(count = pending.len(), "running pending migrations");

        for version in pending {
            self.migrate_up(version).await?;
        }

        Ok(())
    }

    pub async fn migrate_up(&self, version: MigrationVersion) -> Result<()> {
        let name = {
            let migrations = self.migrations.read();
            let migration = migrations
                .get(&version)
                .ok_or_else(|| DatabaseError::Migration(format!("migration {version} not found")))?;
            migration.name().to_string()
        };

        info!(version, name = %name, "running migration");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;

        {
            let migrations = self.migrations.read();
            let migration = migrations.get(&version).unwrap();
            migration.up(&self.pool).await?;
        }

        sqlx::query("INSERT INTO _migrations (version, name, applied_at) VALUES ($1, $2, $3)")
            .bind(version)
            .bind(&name)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::Migration(format!("failed to record migration: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| DatabaseError::Migration(format!("failed to commit migration: {e}")))?;

        self.load_applied().await?;
        info!(version, "migration completed");

        Ok(())
    }
}

/// The two tables this service persists to: `participants` (written by
/// the write path) and `users` (read-only from the core's perspective,
/// populated by whatever external system issues credentials).
pub fn register_leaderboard_migrations(manager: &MigrationManager) {
    manager.register(SqlMigration::new(
        20260101000001,
        "create_users_table",
        r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id TEXT PRIMARY KEY,
                username TEXT NOT NULL
            )
        "#,
    ));

    manager.register(SqlMigration::new(
        20260101000002,
        "create_participants_table",
        r#"
            CREATE TABLE IF NOT EXISTS participants (
                user_id TEXT PRIMARY KEY,
                score BIGINT NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
        "#,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_migrations_are_sorted_by_version() {
        // Exercised end to end (including against a live Postgres instance)
        // in tests/leaderboard_integration_test.rs; this unit test only
        // covers the parts that don't require a connection.
        let a = SqlMigration::new(2, "b", "SELECT 1");
        let b = SqlMigration::new(1, "a", "SELECT 1");
        assert!(a.version() > b.version());
    }
}
