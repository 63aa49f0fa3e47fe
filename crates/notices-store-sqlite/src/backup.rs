//! Database snapshots through the `sqlite3` command-line tool.
//!
//! The snapshot is written to `<basename>.<unix-epoch-seconds>` using the
//! tool's `.backup` dot-command. This takes no lock of its own: callers must
//! not run it while a write is in flight.

use std::{
  io,
  path::{Path, PathBuf},
};

use chrono::Utc;
use thiserror::Error;
use tokio::process::Command;

/// The tool used when none is configured.
pub const DEFAULT_TOOL: &str = "sqlite3";

/// Exit code reported when the backup tool cannot be executed at all.
pub const EXIT_TOOL_UNAVAILABLE: i32 = 127;

#[derive(Debug, Error)]
pub enum BackupError {
  /// The tool binary does not exist (or is not on `PATH`).
  #[error("unable to execute {tool}: {source}")]
  ToolMissing {
    tool:   String,
    #[source]
    source: io::Error,
  },

  /// The tool exists but could not be started.
  #[error("unable to execute {tool}: {source}")]
  Spawn {
    tool:   String,
    #[source]
    source: io::Error,
  },

  /// The tool ran and exited unsuccessfully.
  #[error("some error occurred: {tool} exited with status {code}")]
  ToolFailed { tool: String, code: i32 },
}

impl BackupError {
  /// The process exit code the command line should finish with.
  pub fn exit_code(&self) -> i32 {
    match self {
      BackupError::ToolMissing { .. } | BackupError::Spawn { .. } => EXIT_TOOL_UNAVAILABLE,
      BackupError::ToolFailed { code, .. } => *code,
    }
  }
}

/// A successful snapshot.
#[derive(Debug, Clone)]
pub struct BackupReport {
  pub target: PathBuf,
}

/// Settings for one backup run.
#[derive(Debug, Clone)]
pub struct Backup {
  /// Backup executable, looked up on `PATH` if not absolute.
  pub tool:     String,
  /// The live database file.
  pub database: PathBuf,
  /// Target path before the timestamp suffix; defaults to `<database>.bak`.
  pub basename: Option<PathBuf>,
}

impl Backup {
  pub fn new(database: impl Into<PathBuf>) -> Self {
    Self {
      tool:     DEFAULT_TOOL.to_owned(),
      database: database.into(),
      basename: None,
    }
  }

  /// The path the snapshot would be written to at `epoch_secs`.
  pub fn target_at(&self, epoch_secs: i64) -> PathBuf {
    let base = self
      .basename
      .clone()
      .unwrap_or_else(|| default_basename(&self.database));
    let mut target = base.into_os_string();
    target.push(format!(".{epoch_secs}"));
    PathBuf::from(target)
  }

  /// Run the tool and wait for it to exit. There is no timeout.
  pub async fn run(&self) -> Result<BackupReport, BackupError> {
    let target = self.target_at(Utc::now().timestamp());
    let dot_command = format!(".backup {}", quote_arg(&target));

    tracing::info!(
      tool = %self.tool,
      database = %self.database.display(),
      snapshot = %target.display(),
      "starting backup",
    );

    let status = Command::new(&self.tool)
      .arg("-batch")
      .arg(&self.database)
      .arg(dot_command)
      .status()
      .await
      .map_err(|source| {
        let tool = self.tool.clone();
        if source.kind() == io::ErrorKind::NotFound {
          BackupError::ToolMissing { tool, source }
        } else {
          BackupError::Spawn { tool, source }
        }
      })?;

    if !status.success() {
      // Killed by a signal: no code to forward, report a generic failure.
      let code = status.code().unwrap_or(1);
      tracing::warn!(tool = %self.tool, code, "backup tool failed");
      return Err(BackupError::ToolFailed { tool: self.tool.clone(), code });
    }

    Ok(BackupReport { target })
  }
}

fn default_basename(database: &Path) -> PathBuf {
  let mut base = database.as_os_str().to_owned();
  base.push(".bak");
  PathBuf::from(base)
}

/// Quote a path for a `sqlite3` dot-command argument.
fn quote_arg(path: &Path) -> String {
  let s = path.to_string_lossy();
  if !s.contains('\'') {
    return format!("'{s}'");
  }
  let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
  format!("\"{escaped}\"")
}
