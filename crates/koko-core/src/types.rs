//! # Domain Types
//!
//! Core domain types used throughout the Koko scan engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ProductRecord  │   │  HistoryEntry   │   │  FavoriteEntry  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  key (logical)  │   │  id (numeric)   │   │  key            │       │
//! │  │  display fields │   │  record         │   │  added_at       │       │
//! │  │  image (opaque) │   │  inserted_at    │   │  snapshot       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  BarcodeEntry   │   │   SessionMode   │   │    Language     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  code           │   │  Idle           │   │  Ko / En        │       │
//! │  │  scanned_at     │   │  CameraActive   │   │  Zh / Ja        │       │
//! │  └─────────────────┘   │  Loading ...    │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Keying Rules
//! Every entry type has a logical string key used for deduplication:
//! - HistoryEntry / FavoriteEntry: the record key (product name, or barcode
//!   for barcode-resolved records)
//! - BarcodeEntry: the raw code
//! The synthetic numeric `id` on HistoryEntry exists only for UI lookup and
//! never participates in deduplication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::collection::Keyed;

// =============================================================================
// Product Record
// =============================================================================

/// Nutrition facts attached to a product record.
///
/// All values are display strings passed through unchanged; the engine never
/// interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NutritionFacts {
    pub calories: String,
    pub fat: String,
    pub sodium: String,
    pub carbs: String,
}

/// A resolved product, immutable once produced by a resolver.
///
/// ## Display Fields
/// Everything except `key` and `barcode` is presentation data the engine
/// passes through unchanged. `image` is an opaque handle (a data URL in the
/// demo catalog) and is never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Logical key, unique within a collection. The product name for records
    /// resolved from an image or search, the barcode for barcode-resolved
    /// records.
    pub key: String,

    /// Display name shown on the result card.
    pub name: String,

    /// English display name.
    pub name_en: String,

    /// Display price string (e.g. "₩2,500").
    pub price: String,

    /// Star rating, 0.0 to 5.0.
    pub rating: f32,

    /// Review count.
    pub reviews: u32,

    /// Marketing description.
    pub description: String,

    /// Hash-tag style labels.
    pub tags: Vec<String>,

    /// Category display name.
    pub category: String,

    /// Nutrition facts panel.
    pub nutrition: NutritionFacts,

    /// Opaque image reference (data URL in the demo catalog).
    pub image: String,

    /// The barcode this record was resolved from, if any.
    pub barcode: Option<String>,
}

/// An opaque captured image payload.
///
/// The engine never looks inside; it exists only to be handed to a resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePayload(pub Vec<u8>);

impl ImagePayload {
    /// Returns the payload size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks whether the payload is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// Collection Entries
// =============================================================================

/// A scan history entry.
///
/// Wraps a [`ProductRecord`] with the insertion timestamp and a synthetic
/// numeric id. Unique by `record.key`; re-inserting an existing key removes
/// the old entry and prepends a fresh one (refresh-to-top).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Synthetic id used only for UI lookup. Monotonic per collection.
    pub id: i64,

    /// The resolved product.
    pub record: ProductRecord,

    /// When this entry was (re-)inserted.
    #[ts(as = "String")]
    pub inserted_at: DateTime<Utc>,
}

impl Keyed for HistoryEntry {
    fn key(&self) -> &str {
        &self.record.key
    }
}

/// A raw barcode the user scanned or typed, kept for quick re-use.
///
/// Unique by `code`, refresh-to-top on re-scan, capped independently of the
/// scan history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeEntry {
    pub code: String,

    #[ts(as = "String")]
    pub scanned_at: DateTime<Utc>,
}

impl Keyed for BarcodeEntry {
    fn key(&self) -> &str {
        &self.code
    }
}

/// The subset of product data frozen into a favorite.
///
/// ## Snapshot Pattern
/// A favorite keeps its own copy of the display fields so the favorites list
/// renders consistently even if a later scan resolves different data for the
/// same key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteSnapshot {
    pub name: String,
    pub price: String,
    pub rating: f32,
    pub category: String,
    pub image: String,
}

impl From<&ProductRecord> for FavoriteSnapshot {
    fn from(record: &ProductRecord) -> Self {
        FavoriteSnapshot {
            name: record.name.clone(),
            price: record.price.clone(),
            rating: record.rating,
            category: record.category.clone(),
            image: record.image.clone(),
        }
    }
}

/// A favorited product.
///
/// Unique by `key`. Re-favoriting an existing key is a no-op: `added_at` and
/// list position stay exactly as they were. This is intentionally different
/// from history's refresh-to-top semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub key: String,

    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,

    pub snapshot: FavoriteSnapshot,
}

impl Keyed for FavoriteEntry {
    fn key(&self) -> &str {
        &self.key
    }
}

// =============================================================================
// Session Mode
// =============================================================================

/// The single currently-active state of the scanning flow.
///
/// Exactly one mode is active at a time. The mode is transient, memory-only
/// state: every session starts in [`SessionMode::Idle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Nothing in progress; home screen.
    Idle,
    /// Camera stream acquired, waiting for a capture.
    CameraActive,
    /// Barcode entry panel open (manual input or live decode).
    BarcodeScanning,
    /// A resolution is in flight. At most one at a time.
    Loading,
    /// A resolved product is on screen.
    ShowingResult,
    /// A resolution failed; waiting for acknowledgement.
    Error,
}

impl Default for SessionMode {
    fn default() -> Self {
        SessionMode::Idle
    }
}

// =============================================================================
// Preferences
// =============================================================================

/// UI language preference, persisted under the `language` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ko,
    En,
    Zh,
    Ja,
}

impl Language {
    /// BCP 47 code used by speech collaborators.
    pub fn bcp47(&self) -> &'static str {
        match self {
            Language::Ko => "ko-KR",
            Language::En => "en-US",
            Language::Zh => "zh-CN",
            Language::Ja => "ja-JP",
        }
    }

    /// Parses a stored preference string.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ko" => Some(Language::Ko),
            "en" => Some(Language::En),
            "zh" => Some(Language::Zh),
            "ja" => Some(Language::Ja),
            _ => None,
        }
    }

    /// The stored preference string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
            Language::Zh => "zh",
            Language::Ja => "ja",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Ko
    }
}

/// UI theme preference, persisted under the `theme` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_mode_default() {
        assert_eq!(SessionMode::default(), SessionMode::Idle);
    }

    #[test]
    fn test_language_round_trip() {
        for lang in [Language::Ko, Language::En, Language::Zh, Language::Ja] {
            assert_eq!(Language::parse(lang.as_str()), Some(lang));
        }
        assert_eq!(Language::parse("fr"), None);
    }

    #[test]
    fn test_theme_round_trip() {
        assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse("sepia"), None);
        assert_eq!(Theme::default(), Theme::Light);
    }

    #[test]
    fn test_favorite_snapshot_freezes_display_fields() {
        let record = crate::catalog::honey_butter_chip();
        let snapshot = FavoriteSnapshot::from(&record);
        assert_eq!(snapshot.name, record.name);
        assert_eq!(snapshot.price, record.price);
        assert_eq!(snapshot.category, record.category);
    }
}
