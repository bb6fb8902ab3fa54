//! # Key/Value Repository
//!
//! The raw durable-store surface: JSON values by string key.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     KvStore Contract                                    │
//! │                                                                         │
//! │  get(key, default)                                                     │
//! │       │                                                                 │
//! │       ├── row missing ───────────► default                             │
//! │       ├── JSON malformed ────────► warn! + default  (never an error)   │
//! │       └── JSON well-formed ──────► deserialized value                  │
//! │                                                                         │
//! │  set(key, value)                                                       │
//! │       └── upsert whole JSON payload (last writer wins per key)         │
//! │                                                                         │
//! │  Only genuine database failures (connection, query) surface as         │
//! │  StoreError. Corrupt data is a degraded read, not a failure.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};

/// Repository for raw key/value access.
///
/// ## Usage
/// ```rust,ignore
/// let kv = store.kv();
/// let history: Vec<HistoryEntry> = kv.get("scanHistory", Vec::new()).await?;
/// kv.set("scanHistory", &history).await?;
/// ```
#[derive(Debug, Clone)]
pub struct KvStore {
    pool: SqlitePool,
}

impl KvStore {
    /// Creates a new KvStore over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        KvStore { pool }
    }

    /// Loads and deserializes the value stored under `key`.
    ///
    /// Returns `default` when the key is missing or the stored payload does
    /// not deserialize. A malformed payload is logged at `warn!` and treated
    /// exactly like missing data; it is never surfaced to the user.
    pub async fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> StoreResult<T> {
        let row = sqlx::query("SELECT value FROM kv WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            debug!(key, "kv miss, using default");
            return Ok(default);
        };

        let payload: String = row.try_get("value")?;
        match serde_json::from_str(&payload) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(key, %err, "corrupt kv payload, using default");
                Ok(default)
            }
        }
    }

    /// Serializes `value` and upserts it under `key`.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let payload = serde_json::to_string(value).map_err(|e| StoreError::EncodeFailed {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        sqlx::query(
            r#"
            INSERT INTO kv (key, value, updated_at)
            VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(&payload)
        .execute(&self.pool)
        .await?;

        debug!(key, bytes = payload.len(), "kv write");
        Ok(())
    }

    /// Removes the value stored under `key`. Missing keys are fine.
    pub async fn remove(&self, key: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM kv WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Payload {
        name: String,
        count: u32,
    }

    async fn test_store() -> Store {
        Store::new(StoreConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_missing_key_yields_default() {
        let kv = test_store().await.kv();
        let value: Vec<Payload> = kv.get("absent", Vec::new()).await.unwrap();
        assert!(value.is_empty());
    }

    #[tokio::test]
    async fn test_set_then_get_round_trips() {
        let kv = test_store().await.kv();
        let original = Payload {
            name: "허니버터칩".to_string(),
            count: 3,
        };

        kv.set("snack", &original).await.unwrap();
        let loaded: Payload = kv
            .get(
                "snack",
                Payload {
                    name: String::new(),
                    count: 0,
                },
            )
            .await
            .unwrap();
        assert_eq!(loaded, original);
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_value() {
        let kv = test_store().await.kv();
        kv.set("k", &1u32).await.unwrap();
        kv.set("k", &2u32).await.unwrap();
        let value: u32 = kv.get("k", 0).await.unwrap();
        assert_eq!(value, 2);
    }

    #[tokio::test]
    async fn test_corrupt_payload_degrades_to_default() {
        let store = test_store().await;

        // Plant a payload that is not valid JSON for the target type
        sqlx::query("INSERT INTO kv (key, value) VALUES ('bad', 'not json {{')")
            .execute(store.pool())
            .await
            .unwrap();

        let kv = store.kv();
        let value: Vec<Payload> = kv.get("bad", Vec::new()).await.unwrap();
        assert!(value.is_empty());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let kv = test_store().await.kv();
        kv.set("gone", &42u32).await.unwrap();
        kv.remove("gone").await.unwrap();
        kv.remove("gone").await.unwrap();
        let value: u32 = kv.get("gone", 7).await.unwrap();
        assert_eq!(value, 7);
    }
}
