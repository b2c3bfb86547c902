// Soporte Técnico - Web Server
// REST API with Axum over the SQLite store

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use soporte_tecnico::api::{build_router, AppState};
use soporte_tecnico::{Config, SqliteStore, VERSION};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("soporte_tecnico=info,tower_http=info")),
        )
        .init();

    info!(version = VERSION, "starting soporte-tecnico server");

    let config = Config::from_env()?;
    info!(
        database = %config.database_path.display(),
        bind_addr = %config.bind_addr,
        "configuration loaded"
    );

    // Open (and create if needed) the database
    let store = Arc::new(SqliteStore::open(&config.database_path)?);
    let app = build_router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!("server running on http://{}", config.bind_addr);
    info!("  API: /clientes, /tecnicos, /solicitudes");

    axum::serve(listener, app)
        .await
        .context("Server stopped with an error")?;

    Ok(())
}
