use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recovery_status_core::StatusAssembler;
use recovery_status_http::{build_router, AppState};
use recovery_status_storage::{RecoveryStorage, StorageConfig};
use serde::Deserialize;
use tracing::info;

const DATABASE_URL_ENV: &str = "DATABASE_URL";

#[derive(Debug, Parser)]
#[command(author, version, about = "Granule recovery status service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the status API over HTTP.
    Serve {
        #[arg(long, default_value = "config/status.toml")]
        config: PathBuf,
    },
    /// Print the status report of one granule and exit.
    Status {
        #[arg(long, default_value = "config/status.toml")]
        config: PathBuf,
        #[arg(long)]
        granule_id: String,
        #[arg(long)]
        job_id: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct RuntimeConfig {
    http: HttpSection,
    storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct HttpSection {
    bind: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { config } => serve(config).await,
        Command::Status {
            config,
            granule_id,
            job_id,
        } => print_status(config, &granule_id, job_id.as_deref()).await,
    }
}

async fn serve(config_path: PathBuf) -> Result<()> {
    let config = load_config(&config_path)?;
    let storage = RecoveryStorage::connect(&config.storage).await?;
    let app = build_router(AppState::new(Arc::new(storage)));

    let socket: SocketAddr = config
        .http
        .bind
        .parse()
        .with_context(|| format!("invalid socket address {}", config.http.bind))?;

    let listener = tokio::net::TcpListener::bind(socket)
        .await
        .with_context(|| format!("failed to bind {}", config.http.bind))?;

    info!(bind = %config.http.bind, "recovery status service listening");
    axum::serve(listener, app).await.context("axum server failed")
}

async fn print_status(config_path: PathBuf, granule_id: &str, job_id: Option<&str>) -> Result<()> {
    let config = load_config(&config_path)?;
    let storage = RecoveryStorage::connect(&config.storage).await?;
    let assembler = StatusAssembler::new(Arc::new(storage));

    let report = assembler
        .get_status(Some(granule_id), job_id)
        .await
        .with_context(|| format!("status lookup for granule {granule_id} failed"))?;

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize status report")?
    );
    Ok(())
}

fn load_config(config_path: &Path) -> Result<RuntimeConfig> {
    let config_source = std::fs::read_to_string(config_path)
        .with_context(|| format!("failed to read config file {}", config_path.display()))?;
    let config = parse_config(&config_source)
        .with_context(|| format!("invalid config TOML at {}", config_path.display()))?;
    Ok(with_database_override(config, std::env::var(DATABASE_URL_ENV).ok()))
}

fn parse_config(source: &str) -> Result<RuntimeConfig> {
    Ok(toml::from_str(source)?)
}

fn with_database_override(mut config: RuntimeConfig, database_url: Option<String>) -> RuntimeConfig {
    if let Some(url) = database_url.filter(|url| !url.is_empty()) {
        info!("{DATABASE_URL_ENV} overrides storage.database_url");
        config.storage.database_url = url;
    }
    config
}
