// Commercial Paper Registry - Web Server
// REST API with Axum over the dispatcher

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use cp_registry::api::{build_router, AppState};
use cp_registry::{open_registry, AppConfig, Dispatcher, LedgerConfig, NamespaceConfig};

#[derive(Debug, Parser)]
#[command(name = "cp-registry-server", version, about = "Commercial paper registry REST service")]
struct Cli {
    /// Socket address to bind
    #[arg(long, default_value = "127.0.0.1:3000", env = "CP_REGISTRY_LISTEN")]
    listen: SocketAddr,

    /// SQLite ledger file; omit to keep the ledger in memory
    #[arg(long, env = "CP_REGISTRY_DB")]
    db: Option<PathBuf>,

    /// JSON file overriding namespace prefixes
    #[arg(long, env = "CP_REGISTRY_NAMESPACES")]
    namespaces: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "cp_registry=info,info".to_string()),
        )
        .init();

    let cli = Cli::parse();

    let namespaces = match &cli.namespaces {
        Some(path) => NamespaceConfig::from_json_file(path)?,
        None => NamespaceConfig::default(),
    };
    let ledger = match cli.db {
        Some(path) => LedgerConfig::Sqlite { path },
        None => LedgerConfig::Memory,
    };
    let config = AppConfig { ledger, namespaces };

    let registry = open_registry(&config)?;
    let state = AppState {
        dispatcher: Arc::new(Dispatcher::new(registry)),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("Failed to bind to {}", cli.listen))?;
    info!(
        ledger = config.ledger.label(),
        "cp-registry listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, app).await?;
    Ok(())
}
