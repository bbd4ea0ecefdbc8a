//! KORTEX CLI
//!
//! Terminal client for the KORTEX tactical map portal.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use kortex_cli::admin_cmd::{self, AdminAction};
use kortex_cli::api::{ApiClient, ApiConfig};
use kortex_cli::app::Kortex;
use kortex_cli::auth_cmd::{self, AuthAction};
use kortex_cli::config_cmd::{self, ConfigAction};
use kortex_cli::marker_cmd::{self, MarkerAction};
use kortex_core::storage::ClientStorage;
use kortex_core::tracing_init::init_tracing;
use kortex_core::KortexConfig;

#[derive(Parser, Debug)]
#[command(name = "kortex")]
#[command(version, about = "KORTEX tactical map portal client", long_about = None)]
struct Cli {
    /// Backend base URL (overrides the stored config).
    #[arg(long, env = "KORTEX_API_URL", global = true)]
    api_url: Option<String>,

    /// Client storage file (overrides the stored config).
    #[arg(long, env = "KORTEX_STORAGE", global = true)]
    storage: Option<PathBuf>,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Auth(AuthAction),
    /// View and place map markers.
    Markers {
        #[command(subcommand)]
        action: MarkerAction,
    },
    /// Account approvals (admins only).
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Show or change stored configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing("kortex=warn", cli.log_json);

    let mut stored = KortexConfig::load();
    let command = match cli.command {
        Command::Config { action } => return config_cmd::run(action, &mut stored),
        other => other,
    };

    let mut config = stored;
    if let Some(url) = &cli.api_url {
        config.set_api_url(url)?;
    }
    if let Some(path) = cli.storage {
        config.storage_path = Some(path);
    }

    let storage_path = config.resolved_storage_path()?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        api_url = %config.api_url,
        storage = %storage_path.display(),
        "Starting kortex"
    );

    let storage = ClientStorage::open(&storage_path)?;
    let backend = ApiClient::new(&ApiConfig {
        base_url: config.api_url.clone(),
        timeout: config.request_timeout(),
    })?;
    let mut app = Kortex::new(backend, storage);

    match command {
        Command::Auth(action) => auth_cmd::run(action, &mut app, &config).await,
        Command::Markers { action } => marker_cmd::run(action, &mut app).await,
        Command::Admin { action } => admin_cmd::run(action, &mut app).await,
        // Handled before storage is opened.
        Command::Config { .. } => Ok(()),
    }
}
