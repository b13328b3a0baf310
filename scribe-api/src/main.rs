//! scribe-api - Sensory Scribe analysis service
//!
//! Bootstrap order: TOML config, tracing, root folder, database, research
//! dataset, upstream gateway, then the HTTP listener.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scribe_api::services::{LlmGateway, ResearchData};
use scribe_api::{build_router, db, AppState};
use scribe_common::config::{self, RootFolder, RootFolderResolver};

/// Command-line arguments for scribe-api
#[derive(Parser, Debug)]
#[command(name = "scribe-api")]
#[command(about = "Sensory writing analysis service")]
#[command(version)]
struct Args {
    /// TOML configuration file (default: ~/.config/sensory-scribe/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root folder for the database
    #[arg(short, long, env = "SCRIBE_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "SCRIBE_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SCRIBE_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Read before tracing so [logging] level can seed the filter; load
    // warnings are replayed below once the subscriber exists.
    let (toml_config, config_error) = match &args.config {
        Some(path) => match config::read_toml_config(path) {
            Ok(toml_config) => (toml_config, None),
            Err(e) => (Default::default(), Some(e)),
        },
        None => (config::load_toml_config(None), None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "scribe_api={level},scribe_common={level},tower_http=info",
                    level = toml_config.logging.level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Sensory Scribe (scribe-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    if let Some(e) = config_error {
        warn!("{}; using built-in defaults", e);
    }

    let root_folder = RootFolder::new(
        RootFolderResolver::new(args.root_folder.clone(), &toml_config).resolve(),
    );
    root_folder
        .ensure_exists()
        .context("Failed to create root folder")?;
    info!("Root folder: {}", root_folder.path().display());

    let db_path = root_folder.database_path();
    let pool = db::init_database_pool(&db_path).await?;
    info!("✓ Connected to database: {}", db_path.display());

    let research = ResearchData::load(toml_config.research_data_path.as_deref())?;

    let api_key = config::resolve_api_key(&toml_config);
    let gateway = LlmGateway::from_config(&toml_config.llm)
        .context("Failed to build upstream HTTP client")?;
    info!(
        endpoint = %toml_config.llm.endpoint,
        model = %toml_config.llm.model,
        timeout_secs = toml_config.llm.timeout_secs,
        "Upstream gateway ready"
    );

    let state = AppState::new(pool, gateway, api_key, research);
    let app = build_router(state);

    let host = args.host.unwrap_or(toml_config.server.host);
    let port = args.port.unwrap_or(toml_config.server.port);
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("scribe-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
