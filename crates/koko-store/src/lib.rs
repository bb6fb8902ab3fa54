//! # koko-store: Persistence Layer for the Koko Scan Engine
//!
//! This crate provides durable storage for the scan engine. It uses SQLite
//! with sqlx for async operations, reduced to a deliberately small surface:
//! a JSON key/value table.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Koko Data Flow                                  │
//! │                                                                         │
//! │  ScanEngine mutation (e.g. history upsert)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     koko-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │     Store     │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (kv, colls,   │    │  (embedded)  │  │   │
//! │  │   │               │    │  prefs)       │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ whole-value   │    │ 001_kv.sql   │  │   │
//! │  │   │ WAL mode      │    │ JSON rewrite  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite kv table: scanHistory | favorites | barcodeHistory |           │
//! │                   language | theme                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Store error types
//! - [`kv`] - The raw get/set-by-key JSON surface
//! - [`repository`] - Typed repositories (collections, preferences)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use koko_store::{Store, StoreConfig};
//!
//! let store = Store::new(StoreConfig::new("path/to/koko.db")).await?;
//! let history = store.collections().load_scan_history().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod kv;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use kv::KvStore;
pub use pool::{Store, StoreConfig};
pub use repository::collections::CollectionsRepository;
pub use repository::prefs::PrefsRepository;
