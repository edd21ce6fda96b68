use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use dray::{ConsoleSurface, Emitter, Level, LogRecord, Router, RouterOptions, Surface};

#[derive(Parser)]
#[command(name = "dray", about = "pairsync log router — synthetic traffic driver")]
struct Cli {
    /// Durable store path (defaults to the configured [store] path).
    #[arg(long)]
    store: Option<PathBuf>,

    /// Records each producer emits.
    #[arg(long, default_value_t = 150)]
    count: u64,

    /// Concurrent producers, one per simulated host pair.
    #[arg(long, default_value_t = 4)]
    producers: u64,

    /// Override the durable-store threshold (level name or value).
    #[arg(long)]
    file_level: Option<String>,

    /// Override the console threshold.
    #[arg(long)]
    interactive_level: Option<String>,

    /// Override the third-party floor.
    #[arg(long)]
    external_level: Option<String>,

    /// Disable colored console output.
    #[arg(long)]
    no_color: bool,

    /// Write engine self-diagnostics to /tmp/dray-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/dray-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("dray debug log started — tail -f /tmp/dray-debug.log");
    }

    let mut config = dray::Config::load().unwrap_or_else(|_| dray::Config::defaults());
    if let Some(level) = cli.file_level {
        config.routing.file = level;
    }
    if let Some(level) = cli.interactive_level {
        config.routing.interactive = level;
    }
    if let Some(level) = cli.external_level {
        config.routing.external = level;
    }

    // Validation is fatal before any producer starts.
    let routing = config.routing.validate()?;

    let store = cli.store.unwrap_or_else(|| config.store.path.clone());
    let surface: Box<dyn Surface> = if cli.no_color {
        Box::new(ConsoleSurface::with_color(false))
    } else {
        Box::new(ConsoleSurface::stderr())
    };
    let options = RouterOptions {
        queue_capacity: config.interactive.queue_capacity,
        drain_timeout: config.interactive.drain_timeout(),
        ..RouterOptions::default()
    };
    let router = Arc::new(Router::start(routing, &store, surface, options)?);

    let mut producers = tokio::task::JoinSet::new();
    for host in 0..cli.producers {
        let router = Arc::clone(&router);
        producers.spawn(run_producer(router, host, cli.count));
    }
    while let Some(joined) = producers.join_next().await {
        joined??;
    }

    let report = router.shutdown().await?;
    println!(
        "rendered {} record(s), dropped {} ({} at shutdown) — store at {}",
        report.rendered,
        report.dropped,
        report.dropped_at_shutdown,
        store.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Synthetic traffic — weighted templates over native and third-party origins
// ---------------------------------------------------------------------------

type Template = (&'static str, Level, &'static str);

const NORMAL: &[Template] = &[
    (
        "pairsync.transfer",
        Level::Info,
        "synchronized 14 files (2.1 MiB sent)",
    ),
    (
        "pairsync.transfer",
        Level::Full,
        "apps/config.toml unchanged, skipping",
    ),
    (
        "pairsync.transfer.delta",
        Level::Debug,
        "delta window advanced by 8 blocks",
    ),
    ("pairsync.session", Level::Debug, "keepalive acknowledged"),
    ("pairsync.watch", Level::Info, "picked up 3 changed paths"),
    ("ssh2.transport", Level::Debug, "rekey negotiated"),
    ("zstd", Level::Debug, "frame flushed at level 3"),
    ("notifyd.inotify", Level::Info, "watch descriptor recycled"),
];

const WARN: &[Template] = &[
    (
        "pairsync.transfer",
        Level::Warning,
        "checksum mismatch, resending block",
    ),
    ("pairsync.session", Level::Warning, "peer clock skew above 2s"),
    ("ssh2.transport", Level::Warning, "window stall, throttling"),
];

const ERROR: &[Template] = &[
    (
        "pairsync.transfer",
        Level::Error,
        "failed to open target file, retrying",
    ),
    ("ssh2.transport", Level::Error, "connection reset by peer"),
];

const CRITICAL: &[Template] = &[(
    "pairsync.session",
    Level::Critical,
    "lost session lock, aborting job",
)];

async fn run_producer(
    router: Arc<Router>,
    host: u64,
    count: u64,
) -> Result<(), dray::RouterError> {
    let peer = format!("host-{host:02}");
    let session = Emitter::new(Arc::clone(&router), "pairsync.session").bind("peer", peer.clone());
    session.info("session opened")?;

    // Weights: normal=85%, warn=9%, error=5%, critical=1%
    let pick = |i: u64| -> &'static Template {
        let slot = (i * 31 + host * 7) % 100;
        if slot < 85 {
            &NORMAL[(i as usize) % NORMAL.len()]
        } else if slot < 94 {
            &WARN[(i as usize) % WARN.len()]
        } else if slot < 99 {
            &ERROR[(i as usize) % ERROR.len()]
        } else {
            &CRITICAL[(i as usize) % CRITICAL.len()]
        }
    };

    for i in 0..count {
        let (origin, level, message) = *pick(i);
        let mut fields = BTreeMap::new();
        fields.insert("peer".to_string(), serde_json::json!(peer));
        fields.insert("seq".to_string(), serde_json::json!(i));
        router.submit(LogRecord::with_fields(level, origin, message, fields))?;

        // Let the console consumer keep pace with sustained bursts.
        if i % 16 == 0 {
            tokio::task::yield_now().await;
        }
    }

    session.bind("records", count).info("session closed")?;
    Ok(())
}
