//! fracboard — well fracturing progress monitor
//!
//! Polls a spreadsheet-export JSON document and serves a live dashboard:
//! normalized per-well stage tables, KPI cards, stock levels, and persisted
//! view preferences.
//!
//! # Usage
//!
//! ```bash
//! # Poll ./data.json every 60 seconds, serve on 0.0.0.0:8080
//! fracboard
//!
//! # Poll a remote export every 5 seconds
//! fracboard --data https://exports.example.com/data.json --interval 5
//! ```
//!
//! # Environment Variables
//!
//! - `FRACBOARD_CONFIG`: Path to a TOML config file
//! - `FRACBOARD_CORS_ORIGINS`: Extra allowed CORS origins (development)
//! - `RUST_LOG`: Logging filter (default: info)

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use fracboard::api::{create_app, DashboardState};
use fracboard::config::MonitorConfig;
use fracboard::pipeline::{AppState, DocumentSource, FileSource, HttpSource, Poller};
use fracboard::storage::{JsonFilePrefs, PreferenceStore};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "fracboard")]
#[command(about = "Well fracturing progress monitor")]
#[command(version)]
struct CliArgs {
    /// Path or URL of the well-data JSON document (overrides config)
    #[arg(long, value_name = "PATH_OR_URL")]
    data: Option<String>,

    /// Poll interval in seconds (overrides config)
    #[arg(long)]
    interval: Option<u64>,

    /// Override the server bind address (default: "0.0.0.0:8080")
    #[arg(short, long)]
    addr: Option<String>,

    /// Preferences file path (overrides config)
    #[arg(long)]
    prefs_file: Option<String>,
}

impl CliArgs {
    fn apply_to(&self, config: &mut MonitorConfig) {
        if let Some(data) = &self.data {
            config.data_source = data.clone();
        }
        if let Some(interval) = self.interval {
            config.poll_interval_secs = interval.max(1);
        }
        if let Some(addr) = &self.addr {
            config.server_addr = addr.clone();
        }
        if let Some(prefs_file) = &self.prefs_file {
            config.preferences_file = prefs_file.clone();
        }
    }
}

// ============================================================================
// Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = CliArgs::parse();
    let mut config = MonitorConfig::load();
    args.apply_to(&mut config);

    info!(
        data_source = %config.data_source,
        interval_secs = config.poll_interval_secs,
        addr = %config.server_addr,
        "Starting fracboard"
    );

    let app_state = Arc::new(RwLock::new(AppState::default()));
    let prefs: Arc<dyn PreferenceStore> = Arc::new(JsonFilePrefs::open(&config.preferences_file));

    let source: Box<dyn DocumentSource> = if config.is_http_source() {
        Box::new(HttpSource::new(&config.data_source))
    } else {
        Box::new(FileSource::new(&config.data_source))
    };
    let source_description = format!("{} {}", source.source_name(), source.location());

    let cancel = CancellationToken::new();
    let mut tasks: JoinSet<&'static str> = JoinSet::new();

    // Polling task
    let poller = Poller::new(
        source,
        Duration::from_secs(config.poll_interval_secs.max(1)),
        app_state.clone(),
        prefs.clone(),
    );
    {
        let cancel = cancel.clone();
        tasks.spawn(async move {
            poller.run(cancel).await;
            "Poller"
        });
    }

    // HTTP server task
    let dashboard_state = DashboardState::new(
        app_state,
        prefs,
        source_description,
        config.poll_interval_secs,
    );
    let app = create_app(dashboard_state);
    let listener = tokio::net::TcpListener::bind(&config.server_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server_addr))?;
    info!(addr = %config.server_addr, "Dashboard available");
    {
        let cancel = cancel.clone();
        tasks.spawn(async move {
            let shutdown = cancel.cancelled_owned();
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!(error = %e, "HTTP server failed");
            }
            "HttpServer"
        });
    }

    // Supervise: exit on ctrl-c or if any task finishes unexpectedly.
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        Some(finished) = tasks.join_next() => {
            match finished {
                Ok(name) => error!(task = name, "Task exited unexpectedly"),
                Err(e) => error!(error = %e, "Task panicked"),
            }
        }
    }

    cancel.cancel();
    while tasks.join_next().await.is_some() {}
    info!("Shutdown complete");
    Ok(())
}
