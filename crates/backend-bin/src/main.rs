// ============================
// crates/backend-bin/src/main.rs
// ============================
//! Tokio / Axum entry-point for the HRMS API server.
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use hrms_backend_lib::{
    config::{Settings, StorageBackend, DEFAULT_CONFIG_FILE},
    create_router,
    error::expose_error_details,
    storage::{DocumentStore, SqlStore, Storage},
    AppState,
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// HRMS dashboard API server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Config file (TOML)
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Override `server.port`
    #[arg(long)]
    port: Option<u16>,
    /// Override `storage.backend`
    #[arg(long, value_parser = parse_backend)]
    storage: Option<StorageBackend>,
    /// Override `storage.path`
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn parse_backend(value: &str) -> Result<StorageBackend, String> {
    match value {
        "document" => Ok(StorageBackend::Document),
        "sql" => Ok(StorageBackend::Sql),
        other => Err(format!("unknown storage backend {other:?}, expected document or sql")),
    }
}

fn init_tracing(settings: &Settings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if settings.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn serve<S: Storage>(storage: S, settings: Settings) -> anyhow::Result<()> {
    let addr = settings.bind_addr()?;
    let state = Arc::new(AppState::new(storage, settings)?);
    let app = create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load_from(&args.config)?;
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    if let Some(backend) = args.storage {
        settings.storage.backend = backend;
    }
    if let Some(dir) = args.data_dir {
        settings.storage.path = dir;
    }
    settings.validate()?;

    init_tracing(&settings);
    expose_error_details(settings.server.expose_error_details);

    match settings.storage.backend {
        StorageBackend::Document => {
            let storage = DocumentStore::new(&settings.storage.path)?;
            serve(storage, settings).await
        },
        StorageBackend::Sql => {
            let storage = SqlStore::open(settings.storage.database_file())?;
            serve(storage, settings).await
        },
    }
}
