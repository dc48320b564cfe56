mod action;
mod app;
mod app_state;
mod component;
mod components;
mod focus;
mod theme;
mod view;
mod widgets;

use std::path::PathBuf;

use clap::Parser;

use moodify_core::config::Config;
use moodify_core::coordinator::SearchCoordinator;
use moodify_core::kv::{FileStore, KeyValueStore, MemoryStore};
use moodify_core::platform;
use moodify_core::search::ItunesClient;
use moodify_core::store::MoodStore;

/// Pick a mood, search for songs, keep favorites per mood.
#[derive(Parser, Debug)]
#[command(name = "moodify", version)]
struct Args {
    /// Keep everything in memory; nothing is read from or written to disk.
    #[arg(long)]
    ephemeral: bool,

    /// Directory for the mood and favorites snapshots (overrides config).
    #[arg(long, value_name = "DIR")]
    store_dir: Option<PathBuf>,

    /// Open this mood (by name, any case) instead of the selection screen.
    #[arg(long, value_name = "NAME")]
    mood: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let data_dir = platform::data_dir();
    let log_path = match std::fs::create_dir_all(&data_dir) {
        Ok(()) => platform::log_path(),
        Err(_) => platform::temp_dir().join("moodify.log"),
    };
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("moodify log: {}", log_path.display());

    tracing::info!("moodify starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config unreadable, using defaults: {}", e);
        Config::default()
    });

    // ── Storage ──────────────────────────────────────────────────────────────
    let mut ephemeral = args.ephemeral;
    let kv: Box<dyn KeyValueStore> = if ephemeral {
        Box::new(MemoryStore::new())
    } else {
        let dir = args.store_dir.unwrap_or_else(|| config.storage.dir.clone());
        match FileStore::open(&dir) {
            Ok(store) => {
                tracing::info!("store dir: {}", dir.display());
                Box::new(store)
            }
            Err(e) => {
                tracing::error!("cannot open store at {}: {}", dir.display(), e);
                eprintln!("moodify: {} ({}), running without saving", dir.display(), e);
                ephemeral = true;
                Box::new(MemoryStore::new())
            }
        }
    };
    let store = MoodStore::open(kv);

    // ── Search ───────────────────────────────────────────────────────────────
    let client = ItunesClient::new(&config.search)?;
    let coordinator = SearchCoordinator::new(client, config.search.debounce());

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let mut app = app::App::new(store, coordinator, ephemeral);
    if let Some(name) = args.mood.as_deref() {
        app.open_route(name);
    }
    let result = app.run().await;
    if let Err(ref e) = result {
        tracing::error!("tui exited with error: {}", e);
    }
    tracing::info!("moodify stopped");
    result
}
