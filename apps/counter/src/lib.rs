//! # Slice Counter Library
//!
//! The terminal front end of Slice POS: configuration, startup and the
//! command loop.
//!
//! ## Module Organization
//! ```text
//! slice_counter_lib/
//! ├── lib.rs          ◄─── You are here (CLI flags, startup, logging)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── AppConfig (file, env, validation)
//! │   └── app.rs      ◄─── AppState (catalog, session, admin gate)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command loop and dispatch
//! │   ├── order.rs    ◄─── Menu, cart and order options
//! │   ├── promotion.rs◄─── Promotion prompts
//! │   ├── checkout.rs ◄─── send / print
//! │   └── admin.rs    ◄─── PIN-gated catalog editor
//! ├── console.rs      ◄─── Line I/O over any BufRead/Write
//! ├── export.rs       ◄─── Chat link, receipt printer
//! └── error.rs        ◄─── AppError for commands
//! ```

pub mod commands;
pub mod console;
pub mod error;
pub mod export;
pub mod state;

use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use console::Console;
use error::AppResult;
use slice_db::CatalogSource;
use state::{AppConfig, AppState};

/// Command-line flags. Each one overrides the config file and environment.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "slice-counter", version, about = "Slice POS counter terminal")]
pub struct Cli {
    /// Config file (default: counter.toml in the platform config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Directory for the local fallback cache
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
}

/// Runs the counter until `quit` or end of input.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Counter Startup                                   │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → counter.toml → SLICE_* env → CLI flags                 │
/// │                                                                         │
/// │  3. Open Storage ─────────────────────────────────────────────────────► │
/// │     • SQLite with WAL mode, pending migrations                          │
/// │     • offline (cache only) if the database can't be opened              │
/// │                                                                         │
/// │  4. Load Catalog ─────────────────────────────────────────────────────► │
/// │     • database → local cache → seed menu                                │
/// │                                                                         │
/// │  5. Command Loop ─────────────────────────────────────────────────────► │
/// │     • stdin / stdout                                                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> AppResult<()> {
    init_tracing();

    info!("Starting Slice POS counter");

    let mut config = AppConfig::load(cli.config)?;
    if let Some(db) = cli.db {
        config.storage.database_path = Some(db);
    }
    if let Some(dir) = cli.cache_dir {
        config.storage.cache_dir = Some(dir);
    }
    info!(
        db = %config.database_path().display(),
        cache = %config.cache_dir().display(),
        "Configuration loaded"
    );

    let mut state = AppState::open(config).await;
    match state.catalog_source() {
        CatalogSource::Primary => {}
        CatalogSource::Cache => warn!("Using the locally cached catalog"),
        CatalogSource::Defaults => warn!("No stored catalog; using the default menu"),
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());

    commands::run_loop(&mut state, &mut console).await
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so they never mix with the prompt on stdout.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=slice_core=trace` - Trace the core crate only
/// - Default: INFO, DEBUG for slice crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,slice=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
