//! Runtime configuration.
//!
//! Values come from an optional TOML file, overridden by `NOTICES_*`
//! environment variables (e.g. `NOTICES_PORT=9000`). Anything left unset
//! falls back to [`ServerConfig::default`].

use std::path::{Path, PathBuf};

use notices_core::notice::{DEFAULT_PAGE_SIZE, DEFAULT_SUMMARY_WIDTH};
use notices_store_sqlite::backup::DEFAULT_TOOL;
use serde::Deserialize;

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store_path:        PathBuf,
  /// Rows per listing page.
  pub page_size:         u32,
  /// Characters of each message shown in the listing.
  pub summary_width:     u32,
  /// Refuse to start if a schema migration fails.
  pub strict_migrations: bool,
  pub backup_tool:       String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:              "localhost".to_owned(),
      port:              8080,
      store_path:        PathBuf::from("./notifications.db"),
      page_size:         DEFAULT_PAGE_SIZE,
      summary_width:     DEFAULT_SUMMARY_WIDTH,
      strict_migrations: true,
      backup_tool:       DEFAULT_TOOL.to_owned(),
    }
  }
}

impl ServerConfig {
  /// Load from `path` (which need not exist) and the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    Self::load_with_env(path, environment())
  }

  fn load_with_env(path: &Path, env: config::Environment) -> Result<Self, config::ConfigError> {
    let mut cfg: Self = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(env)
      .build()?
      .try_deserialize()?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

fn environment() -> config::Environment {
  config::Environment::with_prefix("NOTICES").try_parsing(true)
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
