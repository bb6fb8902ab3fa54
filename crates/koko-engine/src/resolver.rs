//! # Product Resolution Seam
//!
//! Turns a capture, barcode, or search query into a [`ProductRecord`].
//!
//! ## Demo Resolution Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    DemoResolver Behavior                                │
//! │                                                                         │
//! │  Barcode ──► known table hit? ──► that record (keyed by the code)      │
//! │         └──► miss ─────────────► stable fallback demo record,          │
//! │                                  tagged with and keyed by the code     │
//! │                                                                         │
//! │  Image ───► uniform random pick from the demo set (keyed by name)      │
//! │  Query ───► uniform random pick from the demo set (keyed by name)      │
//! │                                                                         │
//! │  The demo path NEVER fails. ResolveError exists for real adapters,     │
//! │  which must route failures into the Error mode instead of throwing     │
//! │  past the state machine.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use async_trait::async_trait;
use rand::prelude::IndexedRandom;
use thiserror::Error;
use tracing::debug;

use koko_core::catalog;
use koko_core::session::ResolveInput;
use koko_core::types::ProductRecord;

// =============================================================================
// Resolve Error
// =============================================================================

/// A resolution failure.
///
/// Routed to the `Error` session mode through `ResolutionFailed`; a resolver
/// must never panic across the state machine.
#[derive(Debug, Clone, Error)]
#[error("Resolution failed: {reason}")]
pub struct ResolveError {
    pub reason: String,
}

impl ResolveError {
    pub fn new(reason: impl Into<String>) -> Self {
        ResolveError {
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Resolver Trait
// =============================================================================

/// The resolution seam.
#[async_trait]
pub trait ProductResolver: Send + Sync {
    async fn resolve(&self, input: &ResolveInput) -> Result<ProductRecord, ResolveError>;
}

// =============================================================================
// Demo Resolver
// =============================================================================

/// The reference resolver: hardcoded catalog, no real recognition.
#[derive(Debug, Default)]
pub struct DemoResolver {
    /// Optional artificial delay before answering, for UI demos where an
    /// instant result would hide the loading sequence entirely.
    simulated_latency: Option<Duration>,
}

impl DemoResolver {
    pub fn new() -> Self {
        DemoResolver {
            simulated_latency: None,
        }
    }

    /// Adds an artificial delay before every resolution.
    pub fn with_simulated_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = Some(latency);
        self
    }

    fn pick_demo(&self) -> ProductRecord {
        let set = catalog::demo_set();
        set.choose(&mut rand::rng())
            .cloned()
            .expect("demo set is non-empty")
    }
}

#[async_trait]
impl ProductResolver for DemoResolver {
    async fn resolve(&self, input: &ResolveInput) -> Result<ProductRecord, ResolveError> {
        if let Some(latency) = self.simulated_latency {
            tokio::time::sleep(latency).await;
        }

        let record = match input {
            ResolveInput::Barcode(code) => match catalog::known_product(code) {
                Some(record) => {
                    debug!(code, "barcode hit in known table");
                    record
                }
                None => {
                    debug!(code, "barcode miss, using fallback record");
                    catalog::fallback_for_barcode(code)
                }
            },
            ResolveInput::Image(payload) => {
                debug!(bytes = payload.len(), "image resolution, demo pick");
                self.pick_demo()
            }
            ResolveInput::Query(query) => {
                debug!(query, "search resolution, demo pick");
                self.pick_demo()
            }
        };

        Ok(record)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
