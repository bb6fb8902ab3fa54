//! # Repositories
//!
//! Typed persistence on top of the kv table.
//!
//! - [`collections`] - the three bounded collections, whole-array payloads
//! - [`prefs`] - scalar preference strings (language, theme)

pub mod collections;
pub mod prefs;

/// Well-known keys in the kv table.
///
/// These names are part of the persisted data layout; renaming one orphans
/// existing user data.
pub mod keys {
    /// Ordered array of HistoryEntry, capacity 10.
    pub const SCAN_HISTORY: &str = "scanHistory";
    /// Ordered array of FavoriteEntry, uncapped.
    pub const FAVORITES: &str = "favorites";
    /// Ordered array of BarcodeEntry, capacity 10.
    pub const BARCODE_HISTORY: &str = "barcodeHistory";
    /// Scalar preference string.
    pub const LANGUAGE: &str = "language";
    /// Scalar preference string.
    pub const THEME: &str = "theme";
}
