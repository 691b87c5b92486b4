//! User Directory: batch display-name lookup.
//!
//! Deliberately narrow and independent of the authentication subsystem —
//! it owns a single capability, "look up names by identifier," so the
//! leaderboard can be lifted out as a standalone service even though its
//! reference implementation happens to read the same underlying user
//! table as auth does.

pub mod postgres;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

pub use postgres::PostgresUserDirectory;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("user directory unreachable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, DirectoryError>;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Batch lookup; identifiers with no matching row are simply absent
    /// from the returned map rather than erroring.
    async fn get_by_ids(&self, user_ids: &[String]) -> Result<HashMap<String, String>>;
}
