//! # Collections Repository
//!
//! Load/save for the three persisted collections.
//!
//! ## Persistence Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Whole-Array Persistence                                │
//! │                                                                         │
//! │  Engine mutation (upsert/remove)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  save_*(entries) ──► one JSON array payload ──► kv upsert              │
//! │                                                                         │
//! │  Each collection is small (≤ 10 entries for the capped ones), so the   │
//! │  whole array is rewritten after every mutation. No batching, no        │
//! │  write-behind: a reload after any mutation sees the mutation.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Loading goes through [`BoundedCollection::from_entries`], which re-imposes
//! the capacity and uniqueness invariants on whatever the store returns.

use tracing::debug;

use koko_core::collection::UNCAPPED;
use koko_core::{BarcodeEntry, BoundedCollection, FavoriteEntry, HistoryEntry, HISTORY_CAPACITY};

use crate::error::StoreResult;
use crate::kv::KvStore;
use crate::repository::keys;

/// Repository for the scan history, favorites, and barcode history.
#[derive(Debug, Clone)]
pub struct CollectionsRepository {
    kv: KvStore,
}

impl CollectionsRepository {
    /// Creates a new CollectionsRepository.
    pub fn new(kv: KvStore) -> Self {
        CollectionsRepository { kv }
    }

    // -------------------------------------------------------------------------
    // Scan history
    // -------------------------------------------------------------------------

    /// Loads the scan history (empty on first run or corrupt data).
    pub async fn load_scan_history(&self) -> StoreResult<BoundedCollection<HistoryEntry>> {
        let entries: Vec<HistoryEntry> = self.kv.get(keys::SCAN_HISTORY, Vec::new()).await?;
        debug!(count = entries.len(), "loaded scan history");
        Ok(BoundedCollection::from_entries(entries, HISTORY_CAPACITY))
    }

    /// Persists the whole scan history.
    pub async fn save_scan_history(
        &self,
        collection: &BoundedCollection<HistoryEntry>,
    ) -> StoreResult<()> {
        self.kv.set(keys::SCAN_HISTORY, &collection.entries()).await
    }

    // -------------------------------------------------------------------------
    // Favorites
    // -------------------------------------------------------------------------

    /// Loads the favorites (uncapped).
    pub async fn load_favorites(&self) -> StoreResult<BoundedCollection<FavoriteEntry>> {
        let entries: Vec<FavoriteEntry> = self.kv.get(keys::FAVORITES, Vec::new()).await?;
        debug!(count = entries.len(), "loaded favorites");
        Ok(BoundedCollection::from_entries(entries, UNCAPPED))
    }

    /// Persists the whole favorites list.
    pub async fn save_favorites(
        &self,
        collection: &BoundedCollection<FavoriteEntry>,
    ) -> StoreResult<()> {
        self.kv.set(keys::FAVORITES, &collection.entries()).await
    }

    // -------------------------------------------------------------------------
    // Barcode history
    // -------------------------------------------------------------------------

    /// Loads the barcode history (empty on first run or corrupt data).
    pub async fn load_barcode_history(&self) -> StoreResult<BoundedCollection<BarcodeEntry>> {
        let entries: Vec<BarcodeEntry> = self.kv.get(keys::BARCODE_HISTORY, Vec::new()).await?;
        debug!(count = entries.len(), "loaded barcode history");
        Ok(BoundedCollection::from_entries(entries, HISTORY_CAPACITY))
    }

    /// Persists the whole barcode history.
    pub async fn save_barcode_history(
        &self,
        collection: &BoundedCollection<BarcodeEntry>,
    ) -> StoreResult<()> {
        self.kv
            .set(keys::BARCODE_HISTORY, &collection.entries())
            .await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
