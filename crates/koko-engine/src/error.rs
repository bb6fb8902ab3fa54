//! # Engine Error Type
//!
//! Unified error type for the engine's public surface.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Engine                             │
//! │                                                                         │
//! │  Everything the USER should see becomes a notification banner and a    │
//! │  defined mode (Idle or Error). EngineError is what the CALLING CODE    │
//! │  sees: genuine failures of the surrounding machinery (store writes,    │
//! │  startup loads), never ordinary flow outcomes.                         │
//! │                                                                         │
//! │  Rejected barcode        → notification, Ok(())                        │
//! │  Camera permission denied→ notification + Idle, Ok(())                 │
//! │  Store write failed      → Err(EngineError::Store), session intact     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use koko_core::CoreError;
use koko_store::StoreError;

use crate::device::DeviceError;

/// Errors surfaced to the code embedding the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Session logic error (stale history id, unknown favorite key).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Persistence failure. The in-memory session state stays consistent;
    /// the mutation simply did not reach the store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Device (camera/decoder) failure that was not handled internally.
    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
