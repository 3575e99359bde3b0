// Restaurant Catalog - Web Server
// Read-only REST API over the restaurants/dishes catalog

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use restaurant_catalog::api::{self, AppState};
use restaurant_catalog::{ServerConfig, SqliteStore, VERSION};

/// Read-only HTTP API over the restaurant and dish catalog
#[derive(Parser, Debug)]
#[command(name = "catalog-server", version)]
struct Args {
    /// Host address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "CATALOG_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short = 'p', long, default_value_t = 3000, env = "PORT")]
    port: u16,

    /// SQLite database holding the `restaurants` and `dishes` tables
    #[arg(short = 'd', long, default_value = "database.sqlite", env = "CATALOG_DATABASE")]
    database: PathBuf,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, default_value = "info", env = "CATALOG_LOG_LEVEL")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            database: args.database,
            log_level: args.log_level,
        }
    }
}

fn init_logging(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            EnvFilter::try_new(format!(
                "restaurant_catalog={level},catalog_server={level},tower_http={level}",
                level = config.log_level
            ))
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Open the store and check its schema. Any failure here aborts startup.
fn open_store(config: &ServerConfig) -> Result<SqliteStore> {
    if !config.database.exists() {
        anyhow::bail!("database not found at {}", config.database.display());
    }

    let store = SqliteStore::open_read_only(&config.database)
        .with_context(|| format!("failed to open {}", config.database.display()))?;

    let missing = store.missing_tables()?;
    if !missing.is_empty() {
        anyhow::bail!(
            "database {} is missing tables: {}",
            config.database.display(),
            missing.join(", ")
        );
    }

    Ok(store)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from(Args::parse());
    init_logging(&config);

    info!(version = VERSION, "restaurant catalog server starting");

    let store = match open_store(&config) {
        Ok(store) => store,
        Err(e) => {
            error!("startup aborted: {:#}", e);
            error!("seed the catalog first: catalog init && catalog import");
            std::process::exit(1);
        }
    };
    info!(database = %config.database.display(), "database opened read-only");

    let app = api::router(AppState::new(Arc::new(store)));

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    info!("listening on http://{}", addr);
    for path in api::endpoint_paths() {
        info!("  GET {}", path);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
