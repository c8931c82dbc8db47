use chrono::Utc;
use quiz_core::model::SessionState;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, ser};
use crate::codec::{decode_state, encode_state};
use crate::repository::{SessionStore, StorageError};

#[async_trait::async_trait]
impl SessionStore for SqliteRepository {
    async fn save_state(&self, key: &str, state: &SessionState) -> Result<(), StorageError> {
        let payload = encode_state(state)?;
        sqlx::query(
            r"
            INSERT INTO quiz_state (key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn load_state(&self, key: &str) -> Result<Option<SessionState>, StorageError> {
        let row = sqlx::query("SELECT payload FROM quiz_state WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let payload: String = row.try_get("payload").map_err(ser)?;
        decode_state(&payload).map(Some)
    }

    async fn clear_state(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM quiz_state WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}

impl SqliteRepository {
    /// Write a raw payload under `key` without encoding it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the write fails.
    pub async fn put_raw_state(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO quiz_state (key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET payload = excluded.payload
            ",
        )
        .bind(key)
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }
}
