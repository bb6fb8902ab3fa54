//! # koko-engine: Session Orchestration for the Koko Scan Engine
//!
//! This crate wires the pure session reducer from `koko-core` to the real
//! world: injected devices, spawned resolution tasks, and the durable store.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Engine Data Flow                                 │
//! │                                                                         │
//! │  UI event (button press, decoder callback, visibility change)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    koko-engine (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │  ScanEngine::submit_barcode(code)                               │   │
//! │  │       │                                                         │   │
//! │  │       ▼                                                         │   │
//! │  │  koko_core::transition(mode, cmd)   ← pure decision             │   │
//! │  │       │                                                         │   │
//! │  │       ▼                                                         │   │
//! │  │  execute effects: stop decoder, record barcode (persist),       │   │
//! │  │  notify, spawn resolution task ──► complete via ticket gate     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                          │                                      │
//! │       ▼                          ▼                                      │
//! │  koko-store (persist)      CameraDevice / BarcodeDecoder /             │
//! │                            ProductResolver (injected)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`session`] - The [`ScanEngine`]: state ownership, inbound events, snapshots
//! - [`device`] - Camera and decoder trait seams plus demo implementations
//! - [`resolver`] - Product resolution trait seam plus the demo resolver
//! - [`error`] - Engine error type

pub mod device;
pub mod error;
pub mod resolver;
pub mod session;

pub use device::{
    BarcodeDecoder, CameraDevice, CameraStream, DecoderHandle, DemoCamera, DemoDecoder,
    DeviceError,
};
pub use error::{EngineError, EngineResult};
pub use resolver::{DemoResolver, ProductResolver, ResolveError};
pub use session::{EngineConfig, ScanEngine, UiSnapshot};
