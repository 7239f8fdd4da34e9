//! quantdesk - terminal client for the quant research platform.
//!
//! Usage:
//!   quantdesk                                   # factors, backend on localhost:8000
//!   quantdesk 'strategies?status=failed'        # start on a filtered view
//!   quantdesk --mock                            # built-in sample data, no backend
//!   quantdesk --log-file /tmp/qd.log -vv        # trace logging to a file

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use tikv_jemallocator::Jemalloc;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use quantdesk::api::{CachedSource, HttpSource, MockSource, ResearchSource};
use quantdesk::location::Location;
use quantdesk::storage::LayoutStore;
use quantdesk::tui::{App, AppState};

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// Terminal client for browsing factors, strategies, experiences and notes.
#[derive(Parser)]
#[command(name = "quantdesk", about = "Quant research terminal", version)]
struct Args {
    /// Initial location, e.g. `strategies?status=failed&page=2`.
    #[arg(value_name = "LOCATION", default_value = "factors")]
    location: String,

    /// Base URL of the research backend.
    #[arg(long, env = "QUANTDESK_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Serve built-in sample data instead of calling the backend.
    #[arg(long)]
    mock: bool,

    /// HTTP request timeout in seconds.
    #[arg(long, env = "QUANTDESK_TIMEOUT", default_value = "10")]
    timeout: u64,

    /// Seconds a cached page stays fresh.
    #[arg(long, default_value = "30")]
    cache_ttl: u64,

    /// Re-fetch the current view every N seconds (0 disables).
    #[arg(long, default_value = "30")]
    refresh: u64,

    /// File with persisted column widths.
    /// Default: $HOME/.config/quantdesk/layout.json
    #[arg(long, env = "QUANTDESK_LAYOUT", value_name = "PATH")]
    layout: Option<PathBuf>,

    /// Write logs to this file. No logs are written without it.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only log errors.
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(path: &PathBuf, verbose: u8, quiet: bool) -> std::io::Result<()> {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn default_layout_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("quantdesk")
            .join("layout.json")
    })
}

fn main() {
    let args = Args::parse();

    if let Some(ref path) = args.log_file
        && let Err(e) = init_logging(path, args.verbose, args.quiet)
    {
        eprintln!("Error: cannot open log file '{}': {}", path.display(), e);
        std::process::exit(1);
    }

    let start = match Location::try_parse(&args.location) {
        Ok(location) => location,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let source: Box<dyn ResearchSource> = if args.mock {
        Box::new(MockSource::new())
    } else {
        match HttpSource::new(&args.api_url, Duration::from_secs(args.timeout)) {
            Ok(source) => Box::new(source),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    };
    let source = CachedSource::new(source, Duration::from_secs(args.cache_ttl));

    let layout = match args.layout.or_else(default_layout_path) {
        Some(path) => LayoutStore::load(path),
        None => LayoutStore::in_memory(),
    };

    let state = match AppState::new(start, layout) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let app = App::new(Box::new(source), state)
        .with_auto_refresh(Some(Duration::from_secs(args.refresh)));

    if let Err(e) = app.run() {
        eprintln!("Error running TUI: {}", e);
        std::process::exit(1);
    }
}
