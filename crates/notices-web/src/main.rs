//! notices server binary.
//!
//! With no subcommand (or `serve`), reads `config.toml` (or the path given
//! with `--config`), opens the SQLite store and serves the board over HTTP.
//! `backup` snapshots the database with the `sqlite3` tool and exits with the
//! tool's status.

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use notices_store_sqlite::{SqliteStore, backup::Backup};
use notices_web::{AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Notice board server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml", global = true)]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Start the HTTP service (the default).
  Serve,
  /// Snapshot the database to `<BASENAME>.<unix-seconds>`.
  Backup {
    /// Defaults to `<store_path>.bak`.
    basename: Option<PathBuf>,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to read config from {:?}", cli.config))?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => {
      serve(server_cfg).await?;
      Ok(ExitCode::SUCCESS)
    }
    Command::Backup { basename } => Ok(backup(&server_cfg, basename).await),
  }
}

async fn serve(server_cfg: ServerConfig) -> anyhow::Result<()> {
  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.store_path))?;

  notices_web::check_schema(store.reconciliation(), server_cfg.strict_migrations)?;

  let address = server_cfg.address();
  let state = AppState {
    store:  Arc::new(store),
    config: Arc::new(server_cfg),
  };
  let app = notices_web::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Run the backup tool; the message goes to stderr, the status becomes the
/// process exit code.
async fn backup(server_cfg: &ServerConfig, basename: Option<PathBuf>) -> ExitCode {
  let job = Backup {
    tool: server_cfg.backup_tool.clone(),
    basename,
    ..Backup::new(&server_cfg.store_path)
  };

  match job.run().await {
    Ok(report) => {
      tracing::info!(snapshot = %report.target.display(), "backup written");
      eprintln!("Success");
      ExitCode::SUCCESS
    }
    Err(e) => {
      eprintln!("{e}");
      ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
    }
  }
}
