//! HTTP server wiring for Tract.
//!
//! Loads [`ServerConfig`], opens the SQLite store and mounts the JSON API under
//! `/api` behind CORS and request-tracing layers.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use axum::{
  Router,
  http::{HeaderValue, header::InvalidHeaderValue},
};
use config::{ConfigError, Environment, File, Source};
use serde::Deserialize;
use tower_http::{
  cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer},
  trace::TraceLayer,
};
use tract_api::{ApiState, TtlCache, api_router};
use tract_core::store::ProjectStore;
use tract_store_sqlite::StoreOptions;

/// Environment variables with this prefix override file settings, e.g.
/// `TRACT_PORT=9000`.
pub const ENV_PREFIX: &str = "TRACT";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:           String,
  #[serde(default = "default_port")]
  pub port:           u16,
  #[serde(default = "default_store_path")]
  pub store_path:     PathBuf,
  /// Comma-separated CORS origins; `*` allows any origin.
  #[serde(default = "default_allowed_hosts")]
  pub allowed_hosts:  String,
  #[serde(default = "default_cache_ttl_secs")]
  pub cache_ttl_secs: u64,
  /// Enforce unique project names at the storage layer.
  #[serde(default)]
  pub unique_names:   bool,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8000 }
fn default_store_path() -> PathBuf { PathBuf::from("tract.db") }
fn default_allowed_hosts() -> String { "*".to_owned() }
fn default_cache_ttl_secs() -> u64 { 300 }

impl ServerConfig {
  /// Read `path` (optional) and overlay `TRACT_*` environment variables.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::from_source(File::from(path).required(false))
  }

  fn from_source<T>(source: T) -> Result<Self, ConfigError>
  where
    T: Source + Send + Sync + 'static,
  {
    config::Config::builder()
      .add_source(source)
      .add_source(Environment::with_prefix(ENV_PREFIX))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// The store path with a leading `~` expanded.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }

  pub fn store_options(&self) -> StoreOptions {
    StoreOptions {
      unique_names: self.unique_names,
    }
  }

  pub fn cache_ttl(&self) -> Duration { Duration::from_secs(self.cache_ttl_secs) }

  /// `None` means any origin is allowed.
  pub fn allowed_origins(&self) -> Option<Vec<&str>> {
    let origins: Vec<&str> = self
      .allowed_hosts
      .split(',')
      .map(str::trim)
      .filter(|o| !o.is_empty())
      .collect();

    if origins.is_empty() || origins.contains(&"*") {
      None
    } else {
      Some(origins)
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Layers ───────────────────────────────────────────────────────────────────

/// Build the CORS layer for the configured origins.
///
/// Credentials are only allowed with an explicit origin list; browsers reject
/// them alongside a wildcard.
pub fn cors_layer(config: &ServerConfig) -> Result<CorsLayer, InvalidHeaderValue> {
  let Some(origins) = config.allowed_origins() else {
    return Ok(
      CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any),
    );
  };

  let origins = origins
    .into_iter()
    .map(HeaderValue::from_str)
    .collect::<Result<Vec<_>, _>>()?;

  Ok(
    CorsLayer::new()
      .allow_origin(AllowOrigin::list(origins))
      .allow_methods(AllowMethods::mirror_request())
      .allow_headers(AllowHeaders::mirror_request())
      .allow_credentials(true),
  )
}

// ─── Application ──────────────────────────────────────────────────────────────

/// Mount the API for `store` under `/api` with CORS and request tracing.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Result<Router, InvalidHeaderValue>
where
  S: ProjectStore + 'static,
{
  let state = ApiState::new(store, TtlCache::new(config.cache_ttl()));

  Ok(
    Router::new()
      .nest("/api", api_router(state))
      .layer(cors_layer(config)?)
      .layer(TraceLayer::new_for_http()),
  )
}
