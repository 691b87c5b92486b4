//! Connection pooling and schema migrations for the durable store.
//!
//! Trimmed from the teacher's much larger database layer (which also
//! covered spatial indexing, replication, sharding, and backup — none of
//! which this core needs) down to the two concerns a Postgres-backed
//! `DurableStore` actually requires.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("connection pool error: {0}")]
    ConnectionPool(String),

    #[error("query execution error: {0}")]
    QueryExecution(String),

    #[error("migration error: {0}")]
    Migration(String),

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, DatabaseError>;

pub mod connection_pool;
pub mod migrations;

pub use connection_pool::{ConnectionPool, DatabaseConfig};
pub use migrations::{register_leaderboard_migrations, Migration, MigrationManager};
