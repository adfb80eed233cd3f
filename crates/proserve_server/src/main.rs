//! ProServe submissions server.
//!
//! # Usage
//!
//! ```bash
//! # Durable store in ./proserve.sqlite3, port 5000
//! proserve-server
//!
//! # Throwaway in-memory store on a custom port
//! proserve-server --store memory --port 8080
//! ```

use clap::{Parser, ValueEnum};
use log::{error, info};
use proserve_core::{
    default_log_level, init_logging, open_store, LogConfig, StoreConfig, SubmissionService,
};
use proserve_server::{build_router, AppState, ServerConfig};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    Memory,
    Sqlite,
}

/// ProServe website submissions backend
#[derive(Parser, Debug)]
#[command(name = "proserve-server")]
#[command(about = "ProServe website submissions backend")]
#[command(version)]
struct Args {
    /// HTTP server port
    #[arg(short, long, default_value = "5000")]
    port: u16,

    /// Bind address
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,

    /// Record store backend
    #[arg(long, value_enum, default_value_t = StoreKind::Sqlite)]
    store: StoreKind,

    /// SQLite database file (sqlite store only)
    #[arg(long, default_value = proserve_core::config::DEFAULT_DB_FILE_NAME)]
    db_path: PathBuf,

    /// Log level (trace, debug, info, warn, error); defaults by build mode
    #[arg(long)]
    log_level: Option<String>,

    /// Log directory; defaults to ./logs
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Args {
    fn store_config(&self) -> StoreConfig {
        match self.store {
            StoreKind::Memory => StoreConfig::Memory,
            StoreKind::Sqlite => StoreConfig::Sqlite {
                path: self.db_path.clone(),
            },
        }
    }

    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind: self.bind.clone(),
            port: self.port,
        }
    }

    fn log_config(&self, cwd: &Path) -> LogConfig {
        let log_dir = match &self.log_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => cwd.join(dir),
            None => cwd.join("logs"),
        };
        LogConfig {
            level: self
                .log_level
                .clone()
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir,
            echo_stderr: true,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=main status=error error={err}");
            eprintln!("proserve-server: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let cwd = std::env::current_dir()?;
    init_logging(&args.log_config(&cwd))?;

    let store_config = args.store_config();
    let store = open_store(&store_config)?;
    let state = Arc::new(AppState::new(
        SubmissionService::new(store),
        store_config.backend_name(),
    ));
    let app = build_router(state);

    let addr = args.server_config().addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        "event=server_start module=main status=ok addr={addr} store={} version={}",
        store_config.backend_name(),
        env!("CARGO_PKG_VERSION")
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=main status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=signal_listen module=main status=error error={err}");
    }
}
