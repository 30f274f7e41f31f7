//! tract-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), overlays
//! `TRACT_*` environment variables, opens the SQLite store and serves the
//! project API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tract_server::ServerConfig;
use tract_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "Tract project server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store_path = server_cfg.resolved_store_path();
  let store = SqliteStore::open(&store_path, server_cfg.store_options())
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  tracing::info!(
    store = ?store_path,
    unique_names = server_cfg.unique_names,
    cache_ttl_secs = server_cfg.cache_ttl_secs,
    "store opened"
  );

  let app = tract_server::app(Arc::new(store), &server_cfg)
    .context("invalid CORS origin in allowed_hosts")?;
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
