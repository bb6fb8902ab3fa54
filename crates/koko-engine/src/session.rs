//! # Scan Engine
//!
//! Owns the session state and drives the pure reducer from `koko-core`.
//!
//! ## State Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     ScanEngine State Ownership                          │
//! │                                                                         │
//! │  UI event                    Engine method            State change      │
//! │  ────────                    ─────────────            ────────────      │
//! │  Tap photo scan ───────────► start_camera() ────────► CameraActive     │
//! │  Tap shutter ──────────────► capture_photo() ───────► Loading          │
//! │  Type barcode + submit ────► submit_barcode() ──────► Loading          │
//! │  Resolver reports back ────► (internal ticket) ─────► ShowingResult    │
//! │  Tap favorite ─────────────► add_favorite() ────────► favorites list   │
//! │  Tab hidden ───────────────► cancel() ──────────────► Idle + teardown  │
//! │                                                                         │
//! │  The session state lives behind ONE async Mutex. Every mutation and    │
//! │  its persist happen under the lock, so collection writes land in the   │
//! │  store strictly in call order. The UI reads through snapshot(), never  │
//! │  by direct mutation.                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Resolution Admission
//! Entering `Loading` bumps a ticket; the spawned resolution task carries
//! that ticket back. A completion whose ticket no longer matches (the user
//! cancelled, or a newer resolution started) is discarded with a debug log.
//! This is the whole of the admission control: one resolution in flight,
//! no queueing, stale results can never clobber a newer session.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use koko_core::collection::BoundedCollection;
use koko_core::session::{transition, Effect, Outcome, ResolveInput, SessionCommand};
use koko_core::{
    BarcodeEntry, CoreError, FavoriteEntry, HistoryEntry, ImagePayload, Language, LoadingSequence,
    Notification, NotificationCenter, ProductRecord, SessionMode, Theme,
};
use koko_store::Store;

use crate::device::{BarcodeDecoder, CameraDevice, CameraStream, DecoderHandle};
use crate::error::EngineResult;
use crate::resolver::{ProductResolver, ResolveError};

// =============================================================================
// Configuration
// =============================================================================

/// Engine configuration.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Optional deadline for a resolution in flight.
    ///
    /// `None` (the default) reproduces the reference behavior: if a resolver
    /// never reports back the session stays in `Loading` indefinitely.
    /// Setting a deadline arms a task that fails the in-flight ticket
    /// through the normal `ResolutionFailed` path.
    pub loading_deadline: Option<Duration>,

    /// Status messages cycled through while loading. `None` uses the
    /// default sequence.
    pub loading_messages: Option<Vec<String>>,
}

// =============================================================================
// Session State
// =============================================================================

/// Everything mutable the engine owns. Lives behind the engine's Mutex.
struct SessionState {
    mode: SessionMode,
    /// Admission ticket for the current `Loading` entry.
    ticket: u64,
    camera: Option<Box<dyn CameraStream>>,
    decoder: Option<Box<dyn DecoderHandle>>,
    loading_started: Option<Instant>,
    current: Option<ProductRecord>,
    scan_history: BoundedCollection<HistoryEntry>,
    favorites: BoundedCollection<FavoriteEntry>,
    barcode_history: BoundedCollection<BarcodeEntry>,
    notifications: NotificationCenter,
    language: Language,
    theme: Theme,
}

impl SessionState {
    /// Releases the camera stream. Idempotent; safe with no stream held.
    fn release_camera(&mut self) {
        if let Some(mut stream) = self.camera.take() {
            stream.stop();
            debug!("camera stream released");
        }
    }

    /// Stops the decoder. Idempotent; safe with no handle held.
    fn stop_decoder(&mut self) {
        if let Some(mut handle) = self.decoder.take() {
            handle.stop();
            debug!("decoder stopped");
        }
    }

    /// Next synthetic history id: monotonic per collection.
    fn next_history_id(&self) -> i64 {
        self.scan_history
            .iter()
            .map(|e| e.id)
            .max()
            .unwrap_or(0)
            .saturating_add(1)
    }
}

// =============================================================================
// UI Snapshot
// =============================================================================

/// Read-only view of the engine state for the UI layer to render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSnapshot {
    pub mode: SessionMode,
    /// The active banner, if still within its display window.
    pub notification: Option<Notification>,
    /// Current staged loading text; only present in `Loading`.
    pub loading_status: Option<String>,
    /// The resolved record on screen; only present in `ShowingResult`.
    pub current: Option<ProductRecord>,
    pub scan_history: Vec<HistoryEntry>,
    pub favorites: Vec<FavoriteEntry>,
    pub barcode_history: Vec<BarcodeEntry>,
    pub favorite_count: usize,
    pub language: Language,
    pub theme: Theme,
}

// =============================================================================
// Scan Engine
// =============================================================================

struct Inner {
    state: Mutex<SessionState>,
    store: Store,
    camera: Box<dyn CameraDevice>,
    decoder: Box<dyn BarcodeDecoder>,
    resolver: Box<dyn ProductResolver>,
    loading_sequence: LoadingSequence,
    config: EngineConfig,
}

/// The scan-session engine.
///
/// Cheap to clone: every clone shares the same session. Owned by the
/// composition root and handed to UI handlers; there is no ambient
/// singleton.
#[derive(Clone)]
pub struct ScanEngine {
    inner: Arc<Inner>,
}

impl ScanEngine {
    /// Builds an engine over the given store and collaborators.
    ///
    /// Loads the three collections and the preferences from the store once;
    /// missing or corrupt data starts empty. The session mode always starts
    /// at `Idle` (it is never persisted).
    pub async fn new(
        store: Store,
        camera: Box<dyn CameraDevice>,
        decoder: Box<dyn BarcodeDecoder>,
        resolver: Box<dyn ProductResolver>,
        config: EngineConfig,
    ) -> EngineResult<Self> {
        let collections = store.collections();
        let prefs = store.prefs();

        let scan_history = collections.load_scan_history().await?;
        let favorites = collections.load_favorites().await?;
        let barcode_history = collections.load_barcode_history().await?;
        let language = prefs.language().await?;
        let theme = prefs.theme().await?;

        info!(
            scan_history = scan_history.len(),
            favorites = favorites.len(),
            barcode_history = barcode_history.len(),
            "scan engine initialized"
        );

        let loading_sequence = match &config.loading_messages {
            Some(messages) => LoadingSequence::new(messages.clone()),
            None => LoadingSequence::default(),
        };

        let state = SessionState {
            mode: SessionMode::Idle,
            ticket: 0,
            camera: None,
            decoder: None,
            loading_started: None,
            current: None,
            scan_history,
            favorites,
            barcode_history,
            notifications: NotificationCenter::new(),
            language,
            theme,
        };

        Ok(ScanEngine {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                store,
                camera,
                decoder,
                resolver,
                loading_sequence,
                config,
            }),
        })
    }

    // -------------------------------------------------------------------------
    // Inbound events: scanning flow
    // -------------------------------------------------------------------------

    /// Opens the camera and enters `CameraActive`.
    ///
    /// Acquisition failure is reported as a notification and the session
    /// returns to `Idle`; it is never left half-acquired.
    pub async fn start_camera(&self) -> EngineResult<()> {
        self.dispatch(SessionCommand::StartCamera).await
    }

    /// Captures a photo and starts an image resolution.
    pub async fn capture_photo(&self, payload: ImagePayload) -> EngineResult<()> {
        self.dispatch(SessionCommand::CapturePhoto(payload)).await
    }

    /// Closes the camera. A no-op when no stream was ever acquired.
    pub async fn close_camera(&self) -> EngineResult<()> {
        self.dispatch(SessionCommand::CloseCamera).await
    }

    /// Opens the barcode entry panel and starts the decoder.
    pub async fn start_barcode_scan(&self) -> EngineResult<()> {
        self.dispatch(SessionCommand::StartBarcodeScan).await
    }

    /// Submits a manually typed barcode.
    ///
    /// Validated (min 8 characters, digits only); invalid input is rejected
    /// with a warning banner and no mode change.
    pub async fn submit_barcode(&self, code: &str) -> EngineResult<()> {
        self.dispatch(SessionCommand::SubmitBarcode(code.to_string()))
            .await
    }

    /// Feeds a decoder-produced code into the session (scanner callback).
    pub async fn decode_barcode(&self, code: &str) -> EngineResult<()> {
        self.dispatch(SessionCommand::DecodeBarcode(code.to_string()))
            .await
    }

    /// Closes the barcode entry panel.
    pub async fn close_barcode_input(&self) -> EngineResult<()> {
        self.dispatch(SessionCommand::CloseBarcodeInput).await
    }

    /// Starts a free-text search resolution.
    pub async fn search(&self, query: &str) -> EngineResult<()> {
        self.dispatch(SessionCommand::Search(query.to_string()))
            .await
    }

    /// Dismisses the result card.
    pub async fn close_result(&self) -> EngineResult<()> {
        self.dispatch(SessionCommand::CloseResult).await
    }

    /// Acknowledges a resolution failure.
    pub async fn acknowledge_error(&self) -> EngineResult<()> {
        self.dispatch(SessionCommand::Acknowledge).await
    }

    /// Forces the session back to `Idle`, tearing down camera and decoder
    /// and abandoning any resolution in flight.
    ///
    /// Route tab-hidden/visibility-loss and low-resource conditions through
    /// this method; it shares the release path with the ordinary close
    /// events, so a device handle can never leak.
    pub async fn cancel(&self) -> EngineResult<()> {
        self.dispatch(SessionCommand::Cancel).await
    }

    /// Shows a history entry again by its synthetic id.
    ///
    /// Re-showing also refreshes the entry to the top of the history, the
    /// same as a fresh scan of the same product.
    pub async fn select_history_item(&self, id: i64) -> EngineResult<()> {
        self.dispatch(SessionCommand::SelectHistoryItem(id)).await
    }

    // -------------------------------------------------------------------------
    // Inbound events: favorites
    // -------------------------------------------------------------------------

    /// Adds the product with the given key to favorites.
    ///
    /// The key must identify the current result or a history entry (the
    /// snapshot is frozen from that record). Re-favoriting an existing key
    /// is a no-op: position and `added_at` stay unchanged, and an info
    /// banner tells the user it was already there.
    pub async fn add_favorite(&self, key: &str) -> EngineResult<()> {
        let mut state = self.inner.state.lock().await;

        let record = state
            .current
            .as_ref()
            .filter(|r| r.key == key)
            .cloned()
            .or_else(|| {
                state
                    .scan_history
                    .find_by_key(key)
                    .map(|e| e.record.clone())
            })
            .ok_or_else(|| CoreError::ProductNotFound(key.to_string()))?;

        let entry = FavoriteEntry {
            key: record.key.clone(),
            added_at: Utc::now(),
            snapshot: (&record).into(),
        };

        if state.favorites.upsert_if_absent(entry) {
            self.inner
                .store
                .collections()
                .save_favorites(&state.favorites)
                .await?;
            let banner = Notification::success(format!("Added {} to favorites!", record.name));
            state.notifications.publish(banner, Instant::now());
            info!(key, "favorite added");
        } else {
            let banner = Notification::info(format!("{} is already in favorites.", record.name));
            state.notifications.publish(banner, Instant::now());
        }
        Ok(())
    }

    /// Removes a favorite by key. Unknown keys are a silent no-op.
    pub async fn remove_favorite(&self, key: &str) -> EngineResult<()> {
        let mut state = self.inner.state.lock().await;

        if state.favorites.remove_by_key(key) {
            self.inner
                .store
                .collections()
                .save_favorites(&state.favorites)
                .await?;
            let banner = Notification::info("Removed from favorites.");
            state.notifications.publish(banner, Instant::now());
            info!(key, "favorite removed");
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Inbound events: preferences and sharing
    // -------------------------------------------------------------------------

    /// Changes the UI language and persists the preference.
    pub async fn set_language(&self, language: Language) -> EngineResult<()> {
        let mut state = self.inner.state.lock().await;
        self.inner.store.prefs().set_language(language).await?;
        state.language = language;
        let banner = Notification::success(format!("Language changed to {}.", language.as_str()));
        state.notifications.publish(banner, Instant::now());
        Ok(())
    }

    /// Changes the UI theme and persists the preference.
    pub async fn set_theme(&self, theme: Theme) -> EngineResult<()> {
        let mut state = self.inner.state.lock().await;
        self.inner.store.prefs().set_theme(theme).await?;
        state.theme = theme;
        Ok(())
    }

    /// Produces the share text for the product on screen.
    ///
    /// Only valid in `ShowingResult`; the UI layer hands the text to the
    /// platform share sheet or the clipboard.
    pub async fn share_current(&self) -> EngineResult<String> {
        let mut state = self.inner.state.lock().await;
        let record = match (&state.mode, &state.current) {
            (SessionMode::ShowingResult, Some(record)) => record.clone(),
            _ => {
                return Err(CoreError::InvalidMode { mode: state.mode }.into());
            }
        };
        let banner = Notification::success("Product info copied for sharing!");
        state.notifications.publish(banner, Instant::now());
        Ok(format!("{} - discovered with Koko!", record.name))
    }

    // -------------------------------------------------------------------------
    // Outbound: snapshot
    // -------------------------------------------------------------------------

    /// Returns a read-only view of the session for rendering.
    pub async fn snapshot(&self) -> UiSnapshot {
        let state = self.inner.state.lock().await;
        let now = Instant::now();

        let loading_status = match (state.mode, state.loading_started) {
            (SessionMode::Loading, Some(started)) => Some(
                self.inner
                    .loading_sequence
                    .status_at(now.saturating_duration_since(started))
                    .to_string(),
            ),
            _ => None,
        };

        UiSnapshot {
            mode: state.mode,
            notification: state.notifications.current(now).cloned(),
            loading_status,
            current: match state.mode {
                SessionMode::ShowingResult => state.current.clone(),
                _ => None,
            },
            scan_history: state.scan_history.entries().to_vec(),
            favorites: state.favorites.entries().to_vec(),
            barcode_history: state.barcode_history.entries().to_vec(),
            favorite_count: state.favorites.len(),
            language: state.language,
            theme: state.theme,
        }
    }

    /// The current session mode.
    pub async fn mode(&self) -> SessionMode {
        self.inner.state.lock().await.mode
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    async fn dispatch(&self, command: SessionCommand) -> EngineResult<()> {
        let mut state = self.inner.state.lock().await;
        self.dispatch_locked(&mut state, command).await
    }

    async fn dispatch_locked(
        &self,
        state: &mut SessionState,
        command: SessionCommand,
    ) -> EngineResult<()> {
        let previous = state.mode;
        match transition(previous, &command) {
            Outcome::Ignored => {
                debug!(?previous, ?command, "ignored command");
                Ok(())
            }
            Outcome::Rejected { notice } => {
                debug!(?previous, ?command, notice = %notice.message, "rejected command");
                state.notifications.publish(notice, Instant::now());
                Ok(())
            }
            Outcome::Transition { next, effects } => {
                debug!(?previous, ?next, ?command, "transition");
                state.mode = next;
                if next != SessionMode::Loading {
                    state.loading_started = None;
                }
                if next == SessionMode::Idle {
                    state.current = None;
                }

                for effect in effects {
                    self.run_effect(state, previous, effect).await?;
                }
                Ok(())
            }
        }
    }

    async fn run_effect(
        &self,
        state: &mut SessionState,
        previous: SessionMode,
        effect: Effect,
    ) -> EngineResult<()> {
        match effect {
            Effect::AcquireCamera => match self.inner.camera.open().await {
                Ok(stream) => {
                    state.camera = Some(stream);
                }
                Err(err) => {
                    // Resource error: report and fall back to Idle, never a
                    // half-acquired CameraActive.
                    warn!(%err, "camera acquisition failed");
                    state.mode = SessionMode::Idle;
                    state
                        .notifications
                        .publish(Notification::error(err.to_string()), Instant::now());
                }
            },
            Effect::ReleaseCamera => state.release_camera(),
            Effect::StartDecoder => match self.inner.decoder.start().await {
                Ok(handle) => {
                    state.decoder = Some(handle);
                }
                Err(err) => {
                    warn!(%err, "decoder start failed");
                    state.mode = SessionMode::Idle;
                    state
                        .notifications
                        .publish(Notification::error(err.to_string()), Instant::now());
                }
            },
            Effect::StopDecoder => state.stop_decoder(),
            Effect::RecordBarcode(code) => {
                state.barcode_history.upsert_front(BarcodeEntry {
                    code,
                    scanned_at: Utc::now(),
                });
                self.inner
                    .store
                    .collections()
                    .save_barcode_history(&state.barcode_history)
                    .await?;
            }
            Effect::Notify(notification) => {
                state.notifications.publish(notification, Instant::now());
            }
            Effect::BeginResolution(input) => {
                self.begin_resolution(state, input);
            }
            Effect::RecallHistory(id) => {
                match state.scan_history.iter().find(|e| e.id == id) {
                    Some(entry) => {
                        let record = entry.record.clone();
                        self.insert_history(state, record).await?;
                    }
                    None => {
                        // Stale id from the UI: undo the mode commit and tell
                        // the user instead of showing an empty result card.
                        warn!(id, "history entry not found");
                        state.mode = previous;
                        state.notifications.publish(
                            Notification::warning("That scan is no longer in the history."),
                            Instant::now(),
                        );
                    }
                }
            }
            Effect::InsertHistory(record) => {
                self.insert_history(state, record).await?;
            }
            Effect::AbandonResolution => {
                state.ticket = state.ticket.wrapping_add(1);
                state.loading_started = None;
            }
        }
        Ok(())
    }

    /// Inserts (refresh-to-top) into scan history, persists, and makes the
    /// record current.
    async fn insert_history(
        &self,
        state: &mut SessionState,
        record: ProductRecord,
    ) -> EngineResult<()> {
        let entry = HistoryEntry {
            id: state.next_history_id(),
            record: record.clone(),
            inserted_at: Utc::now(),
        };
        state.scan_history.upsert_front(entry);
        self.inner
            .store
            .collections()
            .save_scan_history(&state.scan_history)
            .await?;
        state.current = Some(record);
        Ok(())
    }

    /// Arms the resolution task (and the optional deadline) for a fresh
    /// ticket.
    fn begin_resolution(&self, state: &mut SessionState, input: ResolveInput) {
        state.ticket = state.ticket.wrapping_add(1);
        state.loading_started = Some(Instant::now());
        let ticket = state.ticket;

        let engine = self.clone();
        tokio::spawn(async move {
            let result = engine.inner.resolver.resolve(&input).await;
            engine.complete_resolution(ticket, result).await;
        });

        if let Some(deadline) = self.inner.config.loading_deadline {
            let engine = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(deadline).await;
                engine
                    .complete_resolution(ticket, Err(ResolveError::new("analysis timed out")))
                    .await;
            });
        }
    }

    /// Applies a resolution result if its ticket is still current.
    async fn complete_resolution(&self, ticket: u64, result: Result<ProductRecord, ResolveError>) {
        let mut state = self.inner.state.lock().await;

        if state.mode != SessionMode::Loading || state.ticket != ticket {
            debug!(ticket, current = state.ticket, "stale resolution discarded");
            return;
        }

        let command = match result {
            Ok(record) => SessionCommand::Resolved(record),
            Err(err) => SessionCommand::ResolutionFailed(err.reason),
        };

        if let Err(err) = self.dispatch_locked(&mut state, command).await {
            // The session mode already advanced; only the persist failed.
            error!(%err, "failed to persist resolution outcome");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DemoCamera, DemoDecoder, DeviceError, UnavailableCamera};
    use crate::resolver::DemoResolver;
    use async_trait::async_trait;
    use koko_core::catalog;
    use koko_store::StoreConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Resolver that parks until released, to hold the session in Loading.
    struct GatedResolver {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl ProductResolver for GatedResolver {
        async fn resolve(&self, input: &ResolveInput) -> Result<ProductRecord, ResolveError> {
            self.gate.notified().await;
            match input {
                ResolveInput::Barcode(code) => Ok(catalog::fallback_for_barcode(code)),
                _ => Ok(catalog::honey_butter_chip()),
            }
        }
    }

    /// Camera that counts how many times its stream was stopped.
    struct CountingCamera {
        stops: Arc<AtomicUsize>,
    }

    struct CountingStream {
        stops: Arc<AtomicUsize>,
        stopped: bool,
    }

    impl CameraStream for CountingStream {
        fn stop(&mut self) {
            if !self.stopped {
                self.stopped = true;
                self.stops.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[async_trait]
    impl CameraDevice for CountingCamera {
        async fn open(&self) -> Result<Box<dyn CameraStream>, DeviceError> {
            Ok(Box::new(CountingStream {
                stops: self.stops.clone(),
                stopped: false,
            }))
        }
    }

    async fn demo_engine() -> ScanEngine {
        let store = Store::new(StoreConfig::in_memory()).await.unwrap();
        ScanEngine::new(
            store,
            Box::new(DemoCamera),
            Box::new(DemoDecoder),
            Box::new(DemoResolver::new()),
            EngineConfig::default(),
        )
        .await
        .unwrap()
    }

    async fn gated_engine() -> (ScanEngine, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let store = Store::new(StoreConfig::in_memory()).await.unwrap();
        let engine = ScanEngine::new(
            store,
            Box::new(DemoCamera),
            Box::new(DemoDecoder),
            Box::new(GatedResolver { gate: gate.clone() }),
            EngineConfig::default(),
        )
        .await
        .unwrap();
        (engine, gate)
    }

    /// Polls until the mode changes away from Loading (resolution task done).
    async fn wait_for_mode(engine: &ScanEngine, mode: SessionMode) {
        for _ in 0..200 {
            if engine.mode().await == mode {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("mode never became {mode:?}");
    }

    #[tokio::test]
    async fn test_starts_idle_with_empty_collections() {
        let engine = demo_engine().await;
        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.mode, SessionMode::Idle);
        assert!(snapshot.scan_history.is_empty());
        assert!(snapshot.favorites.is_empty());
        assert!(snapshot.barcode_history.is_empty());
    }

    #[tokio::test]
    async fn test_close_camera_without_stream_does_not_panic() {
        let engine = demo_engine().await;
        engine.close_camera().await.unwrap();
        engine.cancel().await.unwrap();
        assert_eq!(engine.mode().await, SessionMode::Idle);
    }

    #[tokio::test]
    async fn test_camera_failure_returns_to_idle_with_notification() {
        let store = Store::new(StoreConfig::in_memory()).await.unwrap();
        let engine = ScanEngine::new(
            store,
            Box::new(UnavailableCamera),
            Box::new(DemoDecoder),
            Box::new(DemoResolver::new()),
            EngineConfig::default(),
        )
        .await
        .unwrap();

        engine.start_camera().await.unwrap();

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.mode, SessionMode::Idle);
        let banner = snapshot.notification.unwrap();
        assert_eq!(banner.severity, koko_core::Severity::Error);
    }

    #[tokio::test]
    async fn test_capture_releases_camera_exactly_once() {
        let stops = Arc::new(AtomicUsize::new(0));
        let store = Store::new(StoreConfig::in_memory()).await.unwrap();
        let engine = ScanEngine::new(
            store,
            Box::new(CountingCamera {
                stops: stops.clone(),
            }),
            Box::new(DemoDecoder),
            Box::new(DemoResolver::new()),
            EngineConfig::default(),
        )
        .await
        .unwrap();

        engine.start_camera().await.unwrap();
        engine.capture_photo(ImagePayload(vec![1, 2, 3])).await.unwrap();
        // Cancel afterwards must not stop the stream a second time
        engine.cancel().await.unwrap();

        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_loading_rejects_concurrent_triggers() {
        let (engine, gate) = gated_engine().await;

        engine.start_barcode_scan().await.unwrap();
        engine.submit_barcode("8801043032197").await.unwrap();
        assert_eq!(engine.mode().await, SessionMode::Loading);

        // A second trigger while Loading: no-op plus a warning banner
        engine.submit_barcode("8801043126359").await.unwrap();
        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.mode, SessionMode::Loading);
        assert_eq!(snapshot.barcode_history.len(), 1);
        assert_eq!(
            snapshot.notification.unwrap().message,
            "Analysis already in progress."
        );

        gate.notify_one();
        wait_for_mode(&engine, SessionMode::ShowingResult).await;
        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.scan_history.len(), 1);
        assert_eq!(snapshot.scan_history[0].record.key, "8801043032197");
    }

    #[tokio::test]
    async fn test_cancel_during_loading_discards_the_result() {
        let (engine, gate) = gated_engine().await;

        engine.start_barcode_scan().await.unwrap();
        engine.submit_barcode("8801043032197").await.unwrap();
        engine.cancel().await.unwrap();
        assert_eq!(engine.mode().await, SessionMode::Idle);

        // Release the parked resolver; its result must be discarded
        gate.notify_one();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.mode, SessionMode::Idle);
        assert!(snapshot.scan_history.is_empty());
        assert!(snapshot.current.is_none());
    }

    #[tokio::test]
    async fn test_loading_status_follows_the_sequence() {
        let (engine, _gate) = gated_engine().await;

        engine.start_barcode_scan().await.unwrap();
        engine.submit_barcode("8801043032197").await.unwrap();

        let snapshot = engine.snapshot().await;
        assert_eq!(
            snapshot.loading_status.as_deref(),
            Some("Recognizing the product...")
        );
    }

    #[tokio::test]
    async fn test_loading_deadline_routes_to_error_mode() {
        let gate = Arc::new(Notify::new());
        let store = Store::new(StoreConfig::in_memory()).await.unwrap();
        let engine = ScanEngine::new(
            store,
            Box::new(DemoCamera),
            Box::new(DemoDecoder),
            Box::new(GatedResolver { gate: gate.clone() }),
            EngineConfig {
                loading_deadline: Some(Duration::from_millis(20)),
                loading_messages: None,
            },
        )
        .await
        .unwrap();

        engine.start_barcode_scan().await.unwrap();
        engine.submit_barcode("8801043032197").await.unwrap();

        wait_for_mode(&engine, SessionMode::Error).await;

        // Acknowledge returns to Idle; the late result is then stale
        engine.acknowledge_error().await.unwrap();
        gate.notify_one();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(engine.mode().await, SessionMode::Idle);
        assert!(engine.snapshot().await.scan_history.is_empty());
    }

    #[tokio::test]
    async fn test_history_refresh_vs_favorites_idempotence() {
        let engine = demo_engine().await;

        // Two scans, then re-scan the first: refresh-to-top
        engine.start_barcode_scan().await.unwrap();
        engine.submit_barcode("11111111").await.unwrap();
        wait_for_mode(&engine, SessionMode::ShowingResult).await;
        let first_inserted = engine.snapshot().await.scan_history[0].inserted_at;
        engine.close_result().await.unwrap();

        engine.start_barcode_scan().await.unwrap();
        engine.submit_barcode("22222222").await.unwrap();
        wait_for_mode(&engine, SessionMode::ShowingResult).await;
        engine.close_result().await.unwrap();

        engine.start_barcode_scan().await.unwrap();
        engine.submit_barcode("11111111").await.unwrap();
        wait_for_mode(&engine, SessionMode::ShowingResult).await;

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.scan_history.len(), 2);
        assert_eq!(snapshot.scan_history[0].record.key, "11111111");
        // Non-idempotent: inserted_at refreshed on re-scan
        assert!(snapshot.scan_history[0].inserted_at >= first_inserted);

        // Favorites: second add of the same key is a strict no-op
        engine.add_favorite("11111111").await.unwrap();
        let first = engine.snapshot().await.favorites[0].clone();
        engine.add_favorite("22222222").await.unwrap();
        engine.add_favorite("11111111").await.unwrap();

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.favorites.len(), 2);
        assert_eq!(snapshot.favorites[0].key, "22222222");
        assert_eq!(snapshot.favorites[1], first); // added_at and position unchanged
        let banner = snapshot.notification.unwrap();
        assert!(banner.message.contains("already in favorites"));
    }

    #[tokio::test]
    async fn test_remove_favorite_persists() {
        let engine = demo_engine().await;

        engine.start_barcode_scan().await.unwrap();
        engine.submit_barcode("33333333").await.unwrap();
        wait_for_mode(&engine, SessionMode::ShowingResult).await;

        engine.add_favorite("33333333").await.unwrap();
        assert_eq!(engine.snapshot().await.favorite_count, 1);

        engine.remove_favorite("33333333").await.unwrap();
        assert_eq!(engine.snapshot().await.favorite_count, 0);

        // Removing again is a silent no-op
        engine.remove_favorite("33333333").await.unwrap();
    }

    #[tokio::test]
    async fn test_add_favorite_for_unknown_key_errors() {
        let engine = demo_engine().await;
        let err = engine.add_favorite("no-such-key").await.err().unwrap();
        assert!(matches!(
            err,
            crate::error::EngineError::Core(CoreError::ProductNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_select_history_item_reshows_and_refreshes() {
        let engine = demo_engine().await;

        engine.start_barcode_scan().await.unwrap();
        engine.submit_barcode("44444444").await.unwrap();
        wait_for_mode(&engine, SessionMode::ShowingResult).await;
        engine.close_result().await.unwrap();

        engine.start_barcode_scan().await.unwrap();
        engine.submit_barcode("55555555").await.unwrap();
        wait_for_mode(&engine, SessionMode::ShowingResult).await;
        engine.close_result().await.unwrap();

        let older_id = engine
            .snapshot()
            .await
            .scan_history
            .iter()
            .find(|e| e.record.key == "44444444")
            .unwrap()
            .id;

        engine.select_history_item(older_id).await.unwrap();
        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.mode, SessionMode::ShowingResult);
        assert_eq!(snapshot.current.as_ref().unwrap().key, "44444444");
        // Re-shown entry moved back to the front
        assert_eq!(snapshot.scan_history[0].record.key, "44444444");
    }

    #[tokio::test]
    async fn test_select_missing_history_item_warns_and_stays() {
        let engine = demo_engine().await;
        engine.select_history_item(999).await.unwrap();

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.mode, SessionMode::Idle);
        assert!(snapshot.notification.unwrap().message.contains("no longer"));
    }

    #[tokio::test]
    async fn test_language_and_theme_are_persisted() {
        let store = Store::new(StoreConfig::in_memory()).await.unwrap();
        let engine = ScanEngine::new(
            store.clone(),
            Box::new(DemoCamera),
            Box::new(DemoDecoder),
            Box::new(DemoResolver::new()),
            EngineConfig::default(),
        )
        .await
        .unwrap();

        engine.set_language(Language::En).await.unwrap();
        engine.set_theme(Theme::Dark).await.unwrap();

        assert_eq!(store.prefs().language().await.unwrap(), Language::En);
        assert_eq!(store.prefs().theme().await.unwrap(), Theme::Dark);

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.language, Language::En);
        assert_eq!(snapshot.theme, Theme::Dark);
    }

    #[tokio::test]
    async fn test_share_requires_a_result_on_screen() {
        let engine = demo_engine().await;
        assert!(engine.share_current().await.is_err());

        engine.start_barcode_scan().await.unwrap();
        engine.submit_barcode("8801043032197").await.unwrap();
        wait_for_mode(&engine, SessionMode::ShowingResult).await;

        let text = engine.share_current().await.unwrap();
        assert!(text.contains("허니버터칩"));
    }

    #[tokio::test]
    async fn test_invalid_barcode_keeps_mode_and_collections() {
        let engine = demo_engine().await;
        engine.start_barcode_scan().await.unwrap();

        engine.submit_barcode("1234567").await.unwrap();

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.mode, SessionMode::BarcodeScanning);
        assert!(snapshot.barcode_history.is_empty());
        assert_eq!(
            snapshot.notification.unwrap().severity,
            koko_core::Severity::Warning
        );
    }
}
