use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;

use super::{DirectoryError, Result, UserDirectory};

pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn get_by_ids(&self, user_ids: &[String]) -> Result<HashMap<String, String>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query("SELECT user_id, username FROM users WHERE user_id = ANY($1)")
            .bind(user_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| (row.get::<String, _>("user_id"), row.get::<String, _>("username")))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_error_is_descriptive() {
        let err = DirectoryError::Unavailable("timeout".to_string());
        assert!(err.to_string().contains("timeout"));
    }
}
