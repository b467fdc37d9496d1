//! Survey Engine
//!
//! Collects packaged drinking water market survey submissions and serves
//! aggregated analytics:
//! - Submissions stored in a local SQLite record store
//! - Raw submissions mirrored to a spreadsheet web app
//! - Analytics computed from the mirror, falling back to the local store

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};

use api::{router, AppState};
use record_store::{RecordStore, StoreConfig};
use sheet_mirror::{MirrorConfig, ResponseMirror, SheetMirror};
use telemetry::{health, init_tracing_from_env, metrics};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Deployment environment label
    #[serde(default = "default_environment")]
    environment: String,

    #[serde(default)]
    store: StoreConfig,

    #[serde(default)]
    mirror: MirrorConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_environment() -> String {
    "development".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            store: StoreConfig::default(),
            mirror: MirrorConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting Survey Engine v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;

    info!(
        environment = %config.environment,
        store_path = %config.store.path,
        mirror_configured = config.mirror.is_configured(),
        "Loaded configuration"
    );

    // The service runs without a store if it cannot be opened
    let store = match RecordStore::open(config.store.clone()) {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            health().store.set_unhealthy(e.to_string());
            warn!(error = %e, "Record store unavailable, continuing without it");
            None
        }
    };

    let mirror = SheetMirror::from_config(&config.mirror)
        .context("Invalid mirror configuration")?
        .map(|m| Arc::new(m) as Arc<dyn ResponseMirror>);

    check_health(store.as_deref(), mirror.is_some()).await;

    let state = AppState::new(store.clone(), mirror, config.environment.clone());
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down...");
    metrics().log_snapshot();

    if let Some(store) = store {
        match Arc::try_unwrap(store) {
            Ok(store) => {
                if let Err(e) = store.close() {
                    error!("Failed to close record store: {}", e);
                }
            }
            Err(_) => warn!("Record store still referenced at shutdown"),
        }
    }

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?)
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("SURVEY")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Flat variables used by existing deployments
    if let Ok(url) = std::env::var("GOOGLE_SHEET_WEBAPP_URL") {
        config.mirror.url = Some(url);
    }
    if let Ok(path) = std::env::var("SURVEY_DB_PATH") {
        config.store.path = path;
    }
    if let Ok(port) = std::env::var("SURVEY_PORT") {
        config.port = port
            .parse()
            .with_context(|| format!("Invalid SURVEY_PORT {:?}", port))?;
    }
    if let Ok(environment) = std::env::var("SURVEY_ENV") {
        config.environment = environment;
    }

    Ok(config)
}

/// Check component health on startup.
async fn check_health(store: Option<&RecordStore>, mirror_configured: bool) {
    if let Some(store) = store {
        if record_store::health::check_connection(store).await {
            health().store.set_healthy();
            info!("Record store: healthy");
        } else {
            health().store.set_unhealthy("Connection check failed");
            error!("Record store: unhealthy");
        }
    }

    // Mirror health is set by the first forward or listing
    if mirror_configured {
        info!("Spreadsheet mirror: configured");
    } else {
        health().mirror.set_disabled();
        warn!("Spreadsheet mirror: not configured, submissions are stored locally only");
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
