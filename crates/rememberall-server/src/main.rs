//! `rememberall` server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, and serves the JSON API over HTTP.
//!
//! ```text
//! rememberall --config ~/.config/rememberall/config.toml
//! REMEMBERALL_PORT=8080 rememberall
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use rememberall_core::store::ContactStore;
use rememberall_server::{app, load_config};
use rememberall_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "RememberAll contact store server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Run the orphaned-membership sweep and exit without serving.
  #[arg(long)]
  clean: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = load_config(&cli.config).context("failed to load configuration")?;
  let store_cfg = server_cfg.store_config();

  let store = SqliteStore::open_with(store_cfg.clone())
    .await
    .with_context(|| format!("failed to open store at {:?}", store_cfg.path))?;

  if cli.clean || server_cfg.clean_on_start {
    let removed = store
      .clean_orphaned_memberships()
      .await
      .context("orphaned-membership sweep failed")?;
    tracing::info!(removed, "membership sweep complete");
  }
  if cli.clean {
    return Ok(());
  }

  let app = app(Arc::new(store));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
