use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use shelter_api::config::AppConfig;
use shelter_api::database::DatabaseManager;
use shelter_api::{app, AppState};

#[derive(Parser, Debug)]
#[command(name = "shelter-api", version, about = "Pet shelter records API server")]
struct Args {
    /// Port to listen on (overrides SHELTER_API_PORT / PORT)
    #[arg(long)]
    port: Option<u16>,

    /// SQLite connection URL (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = AppConfig::from_env();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(url) = args.database_url {
        config.database.url = url;
    }
    tracing::info!("Starting Pet Shelter API in {:?} mode", config.environment);

    let secret = config.jwt_secret()?;
    let db = DatabaseManager::connect(&config.database)
        .await
        .context("failed to open database")?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, &secret, db.clone());

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Pet Shelter API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
