//! # Error Types
//!
//! Domain-specific error types for koko-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  koko-core errors (this file)                                          │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  koko-store errors (separate crate)                                    │
//! │  └── StoreError       - Persistence failures                           │
//! │                                                                         │
//! │  koko-engine errors (separate crate)                                   │
//! │  └── EngineError      - What the UI layer sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → notification        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (barcode, key, mode, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::types::SessionMode;

// =============================================================================
// Core Error
// =============================================================================

/// Core session logic errors.
///
/// These errors represent rule violations inside the session logic. They
/// should be caught and translated to user-facing notifications.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A history entry with the requested synthetic id does not exist.
    ///
    /// ## When This Occurs
    /// - UI holds a stale id after the entry was evicted
    /// - Id from a different collection
    #[error("History entry not found: {0}")]
    HistoryEntryNotFound(i64),

    /// No product record is available for the requested key.
    ///
    /// ## When This Occurs
    /// - Favoriting a key that is neither the current result nor in history
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The requested operation is not valid in the current session mode.
    #[error("Operation not allowed while session is {mode:?}")]
    InvalidMode { mode: SessionMode },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any mode transition runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., non-digit characters in a barcode).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
