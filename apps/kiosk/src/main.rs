//! # Koko Kiosk
//!
//! Thin composition root around the scan engine: a line-driven demo shell.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: INFO, can be overridden with RUST_LOG                    │
//! │                                                                         │
//! │  2. Determine Database Path ──────────────────────────────────────────► │
//! │     • macOS: ~/Library/Application Support/com.koko.scan/koko.db        │
//! │     • Windows: %APPDATA%/koko/scan/koko.db                              │
//! │     • Linux: ~/.local/share/koko-scan/koko.db                           │
//! │                                                                         │
//! │  3. Connect Store ────────────────────────────────────────────────────► │
//! │     • SQLite with WAL mode, pending migrations applied                  │
//! │                                                                         │
//! │  4. Build Engine ─────────────────────────────────────────────────────► │
//! │     • Demo camera, demo decoder, demo resolver                          │
//! │     • Engine owned here, passed by reference to handlers                │
//! │                                                                         │
//! │  5. Run the command loop until `quit`                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The shell maps lines to engine events 1:1; everything interesting
//! happens inside `koko-engine`.

use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use koko_core::{catalog, ImagePayload, Language, SessionMode, Theme};
use koko_engine::{DemoCamera, DemoDecoder, DemoResolver, EngineConfig, ScanEngine};
use koko_store::{Store, StoreConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Koko kiosk");

    let store = Store::new(StoreConfig::new(database_path())).await?;
    let engine = ScanEngine::new(
        store,
        Box::new(DemoCamera),
        Box::new(DemoDecoder),
        // A little artificial latency so the loading sequence is visible
        Box::new(DemoResolver::new().with_simulated_latency(Duration::from_millis(1_800))),
        EngineConfig::default(),
    )
    .await?;

    println!("Koko kiosk. Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (cmd, arg) = match line.split_once(' ') {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (line, ""),
        };

        match cmd {
            "help" => print_help(),
            "photo" => {
                engine.start_camera().await?;
                engine.capture_photo(ImagePayload(vec![0u8; 16])).await?;
                wait_for_result(&engine).await;
                print_result(&engine).await;
                engine.close_result().await?;
            }
            "scan" => {
                engine.start_barcode_scan().await?;
                engine.submit_barcode(arg).await?;
                if engine.mode().await == SessionMode::Loading {
                    wait_for_result(&engine).await;
                    print_result(&engine).await;
                    engine.close_result().await?;
                } else {
                    // Rejected input: surface the banner and close the panel
                    print_banner(&engine).await;
                    engine.close_barcode_input().await?;
                }
            }
            "search" => {
                for suggestion in catalog::suggestions(arg) {
                    println!("  suggestion: {}", suggestion.name);
                }
                engine.search(arg).await?;
                if engine.mode().await == SessionMode::Loading {
                    wait_for_result(&engine).await;
                    print_result(&engine).await;
                    engine.close_result().await?;
                } else {
                    print_banner(&engine).await;
                }
            }
            "history" => {
                let snapshot = engine.snapshot().await;
                for entry in &snapshot.scan_history {
                    println!(
                        "  #{} {} ({}) at {}",
                        entry.id, entry.record.name, entry.record.key, entry.inserted_at
                    );
                }
                for entry in &snapshot.barcode_history {
                    println!("  barcode {} at {}", entry.code, entry.scanned_at);
                }
            }
            "show" => match arg.parse::<i64>() {
                Ok(id) => {
                    engine.select_history_item(id).await?;
                    print_result(&engine).await;
                    engine.close_result().await?;
                }
                Err(_) => println!("usage: show <id>"),
            },
            "favs" => {
                let snapshot = engine.snapshot().await;
                for entry in &snapshot.favorites {
                    println!("  {} ({}) since {}", entry.snapshot.name, entry.key, entry.added_at);
                }
            }
            "fav" => {
                if let Err(err) = engine.add_favorite(arg).await {
                    println!("  {err}");
                }
                print_banner(&engine).await;
            }
            "unfav" => {
                engine.remove_favorite(arg).await?;
                print_banner(&engine).await;
            }
            "lang" => match Language::parse(arg) {
                Some(language) => engine.set_language(language).await?,
                None => println!("usage: lang <ko|en|zh|ja>"),
            },
            "theme" => match Theme::parse(arg) {
                Some(theme) => engine.set_theme(theme).await?,
                None => println!("usage: theme <light|dark>"),
            },
            "cancel" => engine.cancel().await?,
            "quit" | "exit" => break,
            other => println!("unknown command '{other}', try 'help'"),
        }
    }

    info!("Koko kiosk shutting down");
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// Default level is INFO; override with RUST_LOG (e.g. RUST_LOG=debug).
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Per-platform database file path, creating the data directory if needed.
fn database_path() -> PathBuf {
    let dir = directories::ProjectDirs::from("com", "koko", "scan")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir).ok();
    dir.join("koko.db")
}

/// Polls the mode and echoes the staged loading text while resolving.
async fn wait_for_result(engine: &ScanEngine) {
    let mut last_status = String::new();
    loop {
        let snapshot = engine.snapshot().await;
        match snapshot.mode {
            SessionMode::Loading => {
                if let Some(status) = snapshot.loading_status {
                    if status != last_status {
                        println!("  {status}");
                        last_status = status;
                    }
                }
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            _ => break,
        }
    }
}

async fn print_result(engine: &ScanEngine) {
    let snapshot = engine.snapshot().await;
    match snapshot.current {
        Some(record) => {
            println!("  {} / {}", record.name, record.name_en);
            println!("  {}  ★{} ({} reviews)", record.price, record.rating, record.reviews);
            println!("  {}", record.description);
            println!("  tags: {}", record.tags.join(", "));
        }
        None => print_banner(engine).await,
    }
}

async fn print_banner(engine: &ScanEngine) {
    if let Some(banner) = engine.snapshot().await.notification {
        println!("  [{:?}] {}", banner.severity, banner.message);
    }
}

fn print_help() {
    println!(
        "  photo               capture a photo and analyze it\n  \
         scan <barcode>      submit a barcode (min 8 digits)\n  \
         search <query>      search products\n  \
         history             list scan + barcode history\n  \
         show <id>           re-show a history entry\n  \
         favs                list favorites\n  \
         fav <key>           favorite the product with that key\n  \
         unfav <key>         remove a favorite\n  \
         lang <ko|en|zh|ja>  change language\n  \
         theme <light|dark>  change theme\n  \
         cancel              force the session back to idle\n  \
         quit                exit"
    );
}
