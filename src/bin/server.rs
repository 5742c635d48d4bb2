use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use rapier_auth::config::AppConfig;
use rapier_auth::handlers;
use rapier_auth::services::AccessGate;
use rapier_auth::storage::{MemoryStorageProvider, StorageProvider};

#[tokio::main]
async fn main() {
    // Initialize env first so RUST_LOG may come from .env
    let dotenv_result = dotenvy::dotenv();

    // Initialize logging
    env_logger::init();

    match dotenv_result {
        Ok(_) => info!("Environment variables loaded from .env file"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Load config from environment
    let config = match AppConfig::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, token_ttl={}s",
        config.host,
        config.port,
        config.access_token_ttl.as_secs()
    );
    if config.debug {
        warn!("Debug mode is enabled");
    }

    // Storage backend
    let storage: Arc<dyn StorageProvider> = Arc::new(MemoryStorageProvider::new());
    if let Err(e) = storage.initialize().await {
        error!("Failed to initialize storage: {}", e);
        std::process::exit(1);
    }

    let gate = AccessGate::new(config.clone(), storage.clone());

    let routes = handlers::routes(gate, storage, config.app_name.clone())
        .with(handlers::cors(&config))
        .with(warp::log("rapier_auth"));

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting {} on {}", config.app_name, addr);
    warp::serve(routes).run(addr).await;
}
