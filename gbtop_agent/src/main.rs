//! gbtop_agent: serves host metrics, metric history and a request log over HTTP.

mod api;
mod logs;
mod metrics;
mod state;
mod types;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "gbtop_agent", version)]
#[command(about = "Metrics and request-log backend for gbtop")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Filesystem path whose disk usage is reported
    #[arg(long, env = "DISK_PATH", default_value = metrics::default_disk_path())]
    disk_path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let state = AppState::new(args.disk_path.clone());
    let app = api::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(%addr, disk_path = %args.disk_path.display(), "gbtop_agent listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("server error")
}
