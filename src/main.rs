use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use author_api::config::{AppConfig, StorageBackend};
use author_api::database::DatabaseManager;
use author_api::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "author-api", version, about = "Author resource API server")]
struct Args {
    /// Port to listen on (overrides AUTHOR_API_PORT / PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Storage backend: postgres or memory (overrides STORAGE_BACKEND)
    #[arg(long, value_parser = parse_backend)]
    storage: Option<StorageBackend>,
}

fn parse_backend(value: &str) -> Result<StorageBackend, String> {
    StorageBackend::parse(value).ok_or_else(|| format!("unknown storage backend '{}'", value))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config: AppConfig = author_api::config::config().clone();
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(backend) = args.storage {
        config.database.backend = backend;
    }

    tracing::info!("Starting Author API in {:?} mode", config.environment);
    if config.security.jwt_secret.is_empty() {
        if author_api::is_development!() {
            tracing::warn!("SECURITY_JWT_SECRET is not set; administrator routes will reject every request");
        } else {
            anyhow::bail!("SECURITY_JWT_SECRET must be set outside development");
        }
    }

    let store = DatabaseManager::open(&config.database)
        .await
        .context("failed to open author storage")?;

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let app = author_api::app(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Author API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Author API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
