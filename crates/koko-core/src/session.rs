//! # Scan Session State Machine
//!
//! The session mode reducer: a single pure transition function over typed
//! commands.
//!
//! ## Transition Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Session Transitions                                │
//! │                                                                         │
//! │  Idle ───StartCamera──────────► CameraActive   [AcquireCamera]         │
//! │  Idle ───StartBarcodeScan─────► BarcodeScanning[StartDecoder]          │
//! │  Idle ───Search(query)────────► Loading        [BeginResolution]       │
//! │  Idle ───SelectHistoryItem────► ShowingResult  [RecallHistory]         │
//! │                                                                         │
//! │  CameraActive ───CapturePhoto─► Loading  [ReleaseCamera, BeginRes.]    │
//! │  CameraActive ───CloseCamera──► Idle     [ReleaseCamera]               │
//! │                                                                         │
//! │  BarcodeScanning ─SubmitBarcode/DecodeBarcode─► Loading                │
//! │                    [StopDecoder, RecordBarcode, BeginResolution]       │
//! │  BarcodeScanning ─CloseBarcodeInput──► Idle    [StopDecoder]           │
//! │                                                                         │
//! │  Loading ───Resolved──────────► ShowingResult  [InsertHistory]         │
//! │  Loading ───ResolutionFailed──► Error          [Notify(error)]         │
//! │                                                                         │
//! │  ShowingResult ───CloseResult─► Idle                                   │
//! │  Error ───Acknowledge─────────► Idle                                   │
//! │  *    ───Cancel───────────────► Idle  [teardown + abandon resolution]  │
//! │                                                                         │
//! │  Any trigger not in this table is a no-op: Rejected (with a user       │
//! │  notice) for validation/admission failures, Ignored otherwise.         │
//! │  The machine can never reach an undefined state.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Admission Control
//! At most one resolution is in flight: `CapturePhoto`, `SubmitBarcode`,
//! `DecodeBarcode`, and `Search` are rejected while in `Loading`. There is
//! no queueing; a second trigger is dropped with user feedback.
//!
//! The reducer is pure. Executing the returned effects (device access,
//! persistence, task spawning) is the engine's job.

use crate::notify::Notification;
use crate::types::{ImagePayload, ProductRecord, SessionMode};
use crate::validation::{validate_barcode, validate_search_query};

// =============================================================================
// Commands
// =============================================================================

/// What a resolver is asked to turn into a [`ProductRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveInput {
    /// A captured photo (opaque payload, no vision analysis in the demo).
    Image(ImagePayload),
    /// A scanned or manually entered barcode.
    Barcode(String),
    /// A free-text search query.
    Query(String),
}

/// Every trigger the session accepts, UI-originated and internal alike.
///
/// `Resolved` and `ResolutionFailed` are produced by the engine when a
/// resolution task reports back; the rest map 1:1 to UI events.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    StartCamera,
    CapturePhoto(ImagePayload),
    CloseCamera,
    StartBarcodeScan,
    SubmitBarcode(String),
    DecodeBarcode(String),
    CloseBarcodeInput,
    Search(String),
    SelectHistoryItem(i64),
    CloseResult,
    Acknowledge,
    Cancel,
    Resolved(ProductRecord),
    ResolutionFailed(String),
}

// =============================================================================
// Effects
// =============================================================================

/// Side effects the engine must execute when applying a transition.
///
/// Order matters: effects are listed in execution order (e.g. the camera is
/// released before the capture resolution begins).
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Acquire the camera stream through the injected device.
    AcquireCamera,
    /// Release the camera stream. Idempotent; safe with no stream held.
    ReleaseCamera,
    /// Start the injected barcode decoder.
    StartDecoder,
    /// Stop the barcode decoder. Idempotent.
    StopDecoder,
    /// Record the code in the barcode history collection.
    RecordBarcode(String),
    /// Start a resolution for the given input (enters the loading sequence).
    BeginResolution(ResolveInput),
    /// Look up a history entry by synthetic id and show it again.
    RecallHistory(i64),
    /// Insert the resolved record into scan history (refresh-to-top).
    InsertHistory(ProductRecord),
    /// Publish a notification banner.
    Notify(Notification),
    /// Invalidate the in-flight resolution ticket, if any.
    AbandonResolution,
}

// =============================================================================
// Outcome
// =============================================================================

/// Result of feeding one command to the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A defined transition: the mode changes (possibly to itself) and the
    /// listed effects run in order.
    Transition {
        next: SessionMode,
        effects: Vec<Effect>,
    },
    /// Validation or admission failure: mode unchanged, notice surfaced.
    Rejected { notice: Notification },
    /// Undefined mode/command combination: silent no-op.
    Ignored,
}

impl Outcome {
    fn to(next: SessionMode, effects: Vec<Effect>) -> Self {
        Outcome::Transition { next, effects }
    }

    fn rejected(notice: Notification) -> Self {
        Outcome::Rejected { notice }
    }
}

// =============================================================================
// The Reducer
// =============================================================================

/// Computes the outcome of a command in the given mode.
///
/// Total over all `(mode, command)` pairs: the result is always a defined
/// transition, a rejection, or an explicit no-op. Never panics.
pub fn transition(mode: SessionMode, command: &SessionCommand) -> Outcome {
    use SessionCommand as Cmd;
    use SessionMode as Mode;

    // Cancel wins from every mode: force teardown and drop any in-flight
    // resolution. Safe to issue redundantly.
    if matches!(command, Cmd::Cancel) {
        return Outcome::to(
            Mode::Idle,
            vec![
                Effect::ReleaseCamera,
                Effect::StopDecoder,
                Effect::AbandonResolution,
            ],
        );
    }

    match (mode, command) {
        // ---------------------------------------------------------------------
        // Idle: entry points into the scanning flow
        // ---------------------------------------------------------------------
        (Mode::Idle, Cmd::StartCamera) => {
            Outcome::to(Mode::CameraActive, vec![Effect::AcquireCamera])
        }
        (Mode::Idle, Cmd::StartBarcodeScan) => {
            Outcome::to(Mode::BarcodeScanning, vec![Effect::StartDecoder])
        }
        (Mode::Idle, Cmd::Search(query)) => match validate_search_query(query) {
            Ok(query) if query.is_empty() => {
                Outcome::rejected(Notification::warning("Enter a search term."))
            }
            Ok(query) => Outcome::to(
                Mode::Loading,
                vec![
                    Effect::Notify(Notification::info(format!("Searching for \"{query}\"..."))),
                    Effect::BeginResolution(ResolveInput::Query(query)),
                ],
            ),
            Err(err) => Outcome::rejected(Notification::warning(err.to_string())),
        },
        (Mode::Idle | Mode::ShowingResult, Cmd::SelectHistoryItem(id)) => {
            Outcome::to(Mode::ShowingResult, vec![Effect::RecallHistory(*id)])
        }

        // ---------------------------------------------------------------------
        // CameraActive
        // ---------------------------------------------------------------------
        (Mode::CameraActive, Cmd::CapturePhoto(payload)) => Outcome::to(
            Mode::Loading,
            vec![
                Effect::ReleaseCamera,
                Effect::BeginResolution(ResolveInput::Image(payload.clone())),
            ],
        ),
        (Mode::CameraActive, Cmd::CloseCamera) => {
            Outcome::to(Mode::Idle, vec![Effect::ReleaseCamera])
        }

        // ---------------------------------------------------------------------
        // BarcodeScanning
        // ---------------------------------------------------------------------
        (Mode::BarcodeScanning, Cmd::SubmitBarcode(code)) => match validate_barcode(code) {
            Ok(code) => barcode_resolution(code),
            Err(err) => Outcome::rejected(Notification::warning(err.to_string())),
        },
        // Decoder output is trusted; only manual input is validated.
        (Mode::BarcodeScanning, Cmd::DecodeBarcode(code)) => {
            barcode_resolution(code.trim().to_string())
        }
        (Mode::BarcodeScanning, Cmd::CloseBarcodeInput) => {
            Outcome::to(Mode::Idle, vec![Effect::StopDecoder])
        }

        // ---------------------------------------------------------------------
        // Loading: admission control, completion, failure
        // ---------------------------------------------------------------------
        (
            Mode::Loading,
            Cmd::CapturePhoto(_) | Cmd::SubmitBarcode(_) | Cmd::DecodeBarcode(_) | Cmd::Search(_),
        ) => Outcome::rejected(Notification::warning("Analysis already in progress.")),
        (Mode::Loading, Cmd::Resolved(record)) => Outcome::to(
            Mode::ShowingResult,
            vec![Effect::InsertHistory(record.clone())],
        ),
        (Mode::Loading, Cmd::ResolutionFailed(reason)) => Outcome::to(
            Mode::Error,
            vec![Effect::Notify(Notification::error(format!(
                "Analysis failed: {reason}"
            )))],
        ),

        // ---------------------------------------------------------------------
        // ShowingResult / Error: the way back to Idle
        // ---------------------------------------------------------------------
        (Mode::ShowingResult, Cmd::CloseResult) => Outcome::to(Mode::Idle, vec![]),
        (Mode::Error, Cmd::Acknowledge) => Outcome::to(Mode::Idle, vec![]),

        // ---------------------------------------------------------------------
        // Everything else is an explicit no-op
        // ---------------------------------------------------------------------
        _ => Outcome::Ignored,
    }
}

fn barcode_resolution(code: String) -> Outcome {
    Outcome::to(
        SessionMode::Loading,
        vec![
            Effect::StopDecoder,
            Effect::RecordBarcode(code.clone()),
            Effect::Notify(Notification::info(format!("Analyzing barcode {code}..."))),
            Effect::BeginResolution(ResolveInput::Barcode(code)),
        ],
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
