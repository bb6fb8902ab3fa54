//! # Bounded Collections
//!
//! Capacity-limited, key-deduplicated, most-recent-first collections.
//!
//! ## Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Bounded Collection Semantics                          │
//! │                                                                         │
//! │  upsert_front("B")  on  [A, B, C]   (capacity 3)                       │
//! │       │                                                                 │
//! │       ├── remove old B          → [A, C]                               │
//! │       ├── prepend new B         → [B, A, C]                            │
//! │       └── truncate to capacity  → [B, A, C]      (refresh-to-top)      │
//! │                                                                         │
//! │  upsert_front("D")  on  [B, A, C]   (capacity 3)                       │
//! │       │                                                                 │
//! │       ├── prepend new D         → [D, B, A, C]                         │
//! │       └── truncate to capacity  → [D, B, A]      (oldest evicted)      │
//! │                                                                         │
//! │  upsert_if_absent("B")  on  [D, B, A]                                  │
//! │       └── key exists            → [D, B, A]      (untouched no-op)     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Scan history and barcode history use `upsert_front`; favorites use
//! `upsert_if_absent`. The two must stay separate named operations: history
//! reorders on re-insert, favorites must not.
//!
//! ## Invariants
//! - Length never exceeds capacity (uncapped collections use `UNCAPPED`)
//! - At most one entry per key
//! - Most-recently-affected entry first
//!
//! Persistence is the caller's job; this module is pure.

/// Types that carry a logical deduplication key.
///
/// Key comparison is exact string equality; no normalization is performed.
/// Callers must pre-normalize (trim, case) before constructing entries.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Sentinel capacity for collections without a size cap (favorites).
pub const UNCAPPED: usize = usize::MAX;

/// A capacity-limited, key-deduplicated, most-recent-first list.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedCollection<T: Keyed> {
    entries: Vec<T>,
    capacity: usize,
}

impl<T: Keyed> BoundedCollection<T> {
    /// Creates an empty collection with the given capacity.
    ///
    /// A capacity of 0 yields a collection that silently drops every insert.
    pub fn new(capacity: usize) -> Self {
        BoundedCollection {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Rebuilds a collection from persisted entries.
    ///
    /// Stored data is normally well-formed, but the store is outside our
    /// control: duplicate keys keep their first (most recent) occurrence and
    /// excess entries are dropped so the invariants hold from the first
    /// mutation on.
    pub fn from_entries(entries: Vec<T>, capacity: usize) -> Self {
        let mut collection = BoundedCollection::new(capacity);
        for entry in entries {
            if collection.len() == capacity {
                break;
            }
            if collection.find_by_key(entry.key()).is_none() {
                collection.entries.push(entry);
            }
        }
        collection
    }

    /// Removes any entry with the same key, prepends the new entry, then
    /// truncates to capacity (refresh-to-top).
    ///
    /// Used by scan history and barcode history.
    pub fn upsert_front(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        self.entries.retain(|e| e.key() != item.key());
        self.entries.insert(0, item);
        self.entries.truncate(self.capacity);
    }

    /// Prepends the entry only if its key is not already present.
    ///
    /// Returns `false` (and leaves the collection untouched, including
    /// ordering) when the key exists. Used by favorites: re-favoriting must
    /// not reorder or refresh the existing entry.
    pub fn upsert_if_absent(&mut self, item: T) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.find_by_key(item.key()).is_some() {
            return false;
        }
        self.entries.insert(0, item);
        self.entries.truncate(self.capacity);
        true
    }

    /// Removes the entry with the given key. Returns whether one was removed.
    pub fn remove_by_key(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.key() != key);
        self.entries.len() != before
    }

    /// Finds an entry by key.
    pub fn find_by_key(&self, key: &str) -> Option<&T> {
        self.entries.iter().find(|e| e.key() == key)
    }

    /// Returns the entries, most recent first.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Iterates over the entries, most recent first.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        key: String,
        stamp: u32,
    }

    impl Entry {
        fn new(key: &str, stamp: u32) -> Self {
            Entry {
                key: key.to_string(),
                stamp,
            }
        }
    }

    impl Keyed for Entry {
        fn key(&self) -> &str {
            &self.key
        }
    }

    fn keys<T: Keyed>(c: &BoundedCollection<T>) -> Vec<&str> {
        c.iter().map(|e| e.key()).collect()
    }

    #[test]
    fn test_upsert_front_prepends() {
        let mut c = BoundedCollection::new(10);
        c.upsert_front(Entry::new("a", 1));
        c.upsert_front(Entry::new("b", 2));
        assert_eq!(keys(&c), vec!["b", "a"]);
    }

    #[test]
    fn test_upsert_front_never_exceeds_capacity() {
        let mut c = BoundedCollection::new(10);
        for i in 0..50 {
            c.upsert_front(Entry::new(&format!("k{i}"), i));
            assert!(c.len() <= 10);
        }
        assert_eq!(c.len(), 10);
        // Most recent first, oldest evicted
        assert_eq!(c.entries()[0].key, "k49");
        assert_eq!(c.entries()[9].key, "k40");
    }

    #[test]
    fn test_upsert_front_refreshes_to_top_without_growing() {
        let mut c = BoundedCollection::new(10);
        c.upsert_front(Entry::new("a", 1));
        c.upsert_front(Entry::new("b", 2));
        c.upsert_front(Entry::new("c", 3));

        c.upsert_front(Entry::new("a", 4));
        assert_eq!(c.len(), 3);
        assert_eq!(keys(&c), vec!["a", "c", "b"]);
        // The refreshed entry replaced the old payload
        assert_eq!(c.entries()[0].stamp, 4);
    }

    #[test]
    fn test_at_most_one_entry_per_key() {
        let mut c = BoundedCollection::new(10);
        for i in 0..20 {
            c.upsert_front(Entry::new("same", i));
        }
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_upsert_if_absent_is_a_no_op_on_duplicate() {
        let mut c = BoundedCollection::new(UNCAPPED);
        assert!(c.upsert_if_absent(Entry::new("a", 1)));
        assert!(c.upsert_if_absent(Entry::new("b", 2)));

        // Duplicate: returns false, position and payload untouched
        assert!(!c.upsert_if_absent(Entry::new("a", 99)));
        assert_eq!(keys(&c), vec!["b", "a"]);
        assert_eq!(c.find_by_key("a").unwrap().stamp, 1);
    }

    #[test]
    fn test_remove_by_key() {
        let mut c = BoundedCollection::new(10);
        c.upsert_front(Entry::new("a", 1));
        c.upsert_front(Entry::new("b", 2));

        assert!(c.remove_by_key("a"));
        assert!(!c.remove_by_key("a"));
        assert_eq!(keys(&c), vec!["b"]);
    }

    #[test]
    fn test_zero_capacity_drops_inserts() {
        let mut c = BoundedCollection::new(0);
        c.upsert_front(Entry::new("a", 1));
        assert!(!c.upsert_if_absent(Entry::new("b", 2)));
        assert!(c.is_empty());
    }

    #[test]
    fn test_key_comparison_is_exact() {
        let mut c = BoundedCollection::new(10);
        c.upsert_front(Entry::new("Chip", 1));
        c.upsert_front(Entry::new("chip", 2));
        // No case normalization: two distinct entries
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_from_entries_enforces_invariants() {
        let entries = vec![
            Entry::new("a", 1),
            Entry::new("b", 2),
            Entry::new("a", 3), // duplicate from a tampered store
            Entry::new("c", 4),
        ];
        let c = BoundedCollection::from_entries(entries, 2);
        assert_eq!(keys(&c), vec!["a", "b"]);
        assert_eq!(c.find_by_key("a").unwrap().stamp, 1);
    }
}
