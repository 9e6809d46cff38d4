//! Server wiring for RememberAll: configuration and the top-level router.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use axum::Router;
use rememberall_core::store::ContactStore;
use rememberall_store_sqlite::StoreConfig;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `REMEMBERALL_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  /// Path of the SQLite file; a leading `~/` is expanded.
  pub store_path:      PathBuf,
  pub busy_timeout_ms: u64,
  /// Run the orphaned-membership sweep once at startup.
  pub clean_on_start:  bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:            "127.0.0.1".to_string(),
      port:            5233,
      store_path:      PathBuf::from("rememberall.db"),
      busy_timeout_ms: 5_000,
      clean_on_start:  true,
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn store_config(&self) -> StoreConfig {
    StoreConfig {
      path:         expand_tilde(&self.store_path),
      busy_timeout: Duration::from_millis(self.busy_timeout_ms),
    }
  }
}

/// Layer the optional TOML file at `path` under `REMEMBERALL_*` variables.
pub fn load_config(path: &Path) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("REMEMBERALL").try_parsing(true))
    .build()?
    .try_deserialize()
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The JSON API mounted under `/api`, with request tracing.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .nest("/api", rememberall_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}
