//! End-to-end scan flow against a real (in-memory) store.
//!
//! Exercises the full path: barcode submission → resolution → history
//! insertion → persistence, including the capacity/eviction behavior and
//! reload-after-restart.

use std::time::Duration;

use koko_core::{ImagePayload, SessionMode, HISTORY_CAPACITY};
use koko_engine::{DemoCamera, DemoDecoder, DemoResolver, EngineConfig, ScanEngine};
use koko_store::{Store, StoreConfig};

async fn engine_over(store: Store) -> ScanEngine {
    ScanEngine::new(
        store,
        Box::new(DemoCamera),
        Box::new(DemoDecoder),
        Box::new(DemoResolver::new()),
        EngineConfig::default(),
    )
    .await
    .expect("engine init")
}

/// Polls until the spawned resolution task lands the session in `mode`.
async fn wait_for_mode(engine: &ScanEngine, mode: SessionMode) {
    for _ in 0..200 {
        if engine.mode().await == mode {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("mode never became {mode:?}");
}

/// Runs one complete scan of `code` and returns to Idle.
async fn scan(engine: &ScanEngine, code: &str) {
    engine.start_barcode_scan().await.unwrap();
    engine.submit_barcode(code).await.unwrap();
    wait_for_mode(engine, SessionMode::ShowingResult).await;
    engine.close_result().await.unwrap();
}

#[tokio::test]
async fn scan_history_fills_orders_and_evicts() {
    let store = Store::new(StoreConfig::in_memory()).await.unwrap();
    let engine = engine_over(store).await;

    assert!(engine.snapshot().await.scan_history.is_empty());

    // An unknown barcode resolves to the deterministic fallback record,
    // tagged with and keyed by the code.
    scan(&engine, "88010430321970").await;
    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.scan_history.len(), 1);
    assert_eq!(snapshot.scan_history[0].record.key, "88010430321970");
    assert_eq!(
        snapshot.scan_history[0].record.barcode.as_deref(),
        Some("88010430321970")
    );

    // A second distinct barcode lands in front.
    scan(&engine, "99990000111122").await;
    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.scan_history.len(), 2);
    assert_eq!(snapshot.scan_history[0].record.key, "99990000111122");
    assert_eq!(snapshot.scan_history[1].record.key, "88010430321970");

    // Nine more distinct codes: the cap holds and the oldest is evicted.
    for i in 0..9 {
        scan(&engine, &format!("7770000000{i:04}")).await;
    }
    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.scan_history.len(), HISTORY_CAPACITY);
    assert!(
        !snapshot
            .scan_history
            .iter()
            .any(|e| e.record.key == "88010430321970"),
        "the first (oldest) record must be evicted"
    );
    // Barcode history obeys its own independent cap.
    assert_eq!(snapshot.barcode_history.len(), HISTORY_CAPACITY);
}

#[tokio::test]
async fn known_barcode_resolves_to_catalog_product() {
    let store = Store::new(StoreConfig::in_memory()).await.unwrap();
    let engine = engine_over(store).await;

    scan(&engine, "8801043032197").await;

    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.scan_history[0].record.name_en, "Honey Butter Chip");
    assert_eq!(snapshot.scan_history[0].record.key, "8801043032197");
}

#[tokio::test]
async fn collections_survive_an_engine_restart() {
    let dir = std::env::temp_dir().join(format!("koko-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let db_path = dir.join("scan_flow.db");
    // Start clean: earlier runs of this test leave a file behind
    let _ = std::fs::remove_file(&db_path);

    let store = Store::new(StoreConfig::new(&db_path)).await.unwrap();
    {
        let engine = engine_over(store.clone()).await;
        scan(&engine, "8801043126359").await;
        engine.add_favorite("8801043126359").await.unwrap();
    }
    store.close().await;

    // A fresh store over the same file sees the persisted collections;
    // the mode is transient and resets to Idle.
    let store = Store::new(StoreConfig::new(&db_path)).await.unwrap();
    let engine = engine_over(store).await;

    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.mode, SessionMode::Idle);
    assert_eq!(snapshot.scan_history.len(), 1);
    assert_eq!(snapshot.scan_history[0].record.key, "8801043126359");
    assert_eq!(snapshot.barcode_history.len(), 1);
    assert_eq!(snapshot.favorites.len(), 1);
    assert_eq!(snapshot.favorites[0].snapshot.name, "신라면");

    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn photo_capture_resolves_to_a_demo_product() {
    let store = Store::new(StoreConfig::in_memory()).await.unwrap();
    let engine = engine_over(store).await;

    engine.start_camera().await.unwrap();
    assert_eq!(engine.mode().await, SessionMode::CameraActive);

    engine
        .capture_photo(ImagePayload(vec![0xde, 0xad, 0xbe, 0xef]))
        .await
        .unwrap();
    wait_for_mode(&engine, SessionMode::ShowingResult).await;

    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.scan_history.len(), 1);
    // Image resolutions are keyed by product name, not by a barcode
    assert!(snapshot.scan_history[0].record.barcode.is_none());
}

#[tokio::test]
async fn search_resolves_and_lands_in_history() {
    let store = Store::new(StoreConfig::in_memory()).await.unwrap();
    let engine = engine_over(store).await;

    engine.search("라면").await.unwrap();
    wait_for_mode(&engine, SessionMode::ShowingResult).await;

    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.scan_history.len(), 1);
    assert!(snapshot.current.is_some());
}
