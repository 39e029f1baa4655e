//! Chartdeck server binary.

use anyhow::{Context, Result};
use chartdeck_core::config::AppConfig;
use chartdeck_server::{create_router, AppState};
use clap::Parser;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Chartdeck - spreadsheet ingest and chart definition server
#[derive(Parser, Debug)]
#[command(name = "chartdeckd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "CHARTDECK_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Chartdeck v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file is optional, env vars can provide/override everything)
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();
    let has_config_file = config_path.exists();

    if has_config_file {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}", args.config);
    }

    let has_env_config = std::env::vars()
        .any(|(key, _)| key.starts_with("CHARTDECK_") && key != "CHARTDECK_CONFIG");

    if !has_config_file && !has_env_config {
        anyhow::bail!(
            "No configuration provided.\n\n\
             Provide configuration via one of:\n  \
             1. Config file: chartdeckd --config /path/to/config.toml\n  \
             2. Environment variables: CHARTDECK_SERVER__BIND=0.0.0.0:8080 \
             CHARTDECK_AUTH__SIGNING_SECRET=your-secret chartdeckd\n\n\
             See config/server.example.toml for example configuration.\n\
             Set CHARTDECK_CONFIG env var to specify a default config file path."
        );
    }

    if !has_config_file {
        tracing::info!("Using environment variables for configuration");
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("CHARTDECK_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    // Initialize blob storage and verify it is writable before accepting
    // requests; this catches bad paths and permission problems early.
    let storage = chartdeck_storage::from_config(&config.storage)
        .await
        .context("failed to initialize storage")?;
    storage
        .health_check()
        .await
        .context("storage health check failed")?;
    tracing::info!("Storage backend initialized");

    // Initialize metadata store (runs migrations)
    let metadata = chartdeck_metadata::from_config(&config.metadata)
        .await
        .context("failed to initialize metadata store")?;
    tracing::info!("Metadata store initialized");

    if config.auth.admin_grant_key_hash.is_none() {
        tracing::warn!("No admin grant key configured; admin self-registration is disabled");
    }

    // Create application state and router
    let state = AppState::new(config.clone(), storage, metadata);
    let app = create_router(state);

    // Parse bind address
    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
