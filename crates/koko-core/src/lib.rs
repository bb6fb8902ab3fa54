//! # koko-core: Pure Session Logic for the Koko Scan Engine
//!
//! This crate is the **heart** of the Koko product-scanning engine. It
//! contains all session logic as pure functions and plain data with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Koko Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                       UI Layer (external)                       │   │
//! │  │    Scan buttons ──► Barcode panel ──► Loading ──► Result card  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ inbound events / UiSnapshot            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    koko-engine (orchestration)                  │   │
//! │  │    ScanEngine, CameraDevice, BarcodeDecoder, ProductResolver   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ koko-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐ │   │
//! │  │   │   types   │  │ collection │  │  session  │  │  notify   │ │   │
//! │  │   │  Product  │  │  Bounded   │  │  reducer  │  │  banners  │ │   │
//! │  │   │  entries  │  │ Collection │  │  + modes  │  │  loading  │ │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO TIMERS • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   koko-store (Persistence Layer)                │   │
//! │  │            SQLite key/value table, JSON payloads                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ProductRecord, HistoryEntry, SessionMode, etc.)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation (barcode format, search queries)
//! - [`collection`] - Bounded, key-deduplicated, most-recent-first collections
//! - [`session`] - The session mode reducer (the state machine itself)
//! - [`notify`] - Notification banner and loading sequence coordination
//! - [`catalog`] - The fixed demo product catalog
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, device access is FORBIDDEN here
//! 3. **Total Transitions**: Every command from every mode has a defined outcome
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod collection;
pub mod error;
pub mod notify;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use koko_core::SessionMode` instead of
// `use koko_core::types::SessionMode`

pub use collection::{BoundedCollection, Keyed};
pub use error::{CoreError, ValidationError};
pub use notify::{LoadingSequence, Notification, NotificationCenter, Severity};
pub use session::{transition, Effect, Outcome, SessionCommand};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Capacity of the scan history and barcode history collections.
///
/// ## Why a constant?
/// Both bounded collections share the same cap in the reference app; the
/// favorites collection is uncapped. Callers that need a different cap pass
/// it to [`BoundedCollection::new`] directly.
pub const HISTORY_CAPACITY: usize = 10;

/// Minimum number of digits a manually entered barcode must have.
///
/// Shorter input is rejected at the input boundary without a mode change.
pub const BARCODE_MIN_LENGTH: usize = 8;

/// How long a notification banner stays visible, measured from display.
pub const NOTIFICATION_DISMISS_MS: u64 = 3_500;

/// Cadence of the staged loading status messages.
pub const LOADING_STEP_MS: u64 = 900;
