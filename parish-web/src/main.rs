//! parish-web - Public JSON API server for the church website
//!
//! Serves announcements, events, sermons, the year-partitioned sermon
//! archive, podcasts, and the photo gallery from the shared database and
//! the archive document.

use anyhow::Result;
use clap::Parser;
use parish_common::archive::ArchiveStore;
use parish_common::config::RootFolder;
use parish_common::db::{get_setting, init_database};
use parish_web::{build_router, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "parish-web", about = "Church website JSON API server")]
struct Cli {
    /// Root folder holding the database and data documents
    #[arg(long)]
    root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting parish-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root = RootFolder::resolve(cli.root.as_deref());
    root.ensure_exists()?;
    info!("Root folder: {}", root.path().display());

    let pool = init_database(&root.database_path()).await?;
    info!("✓ Database ready: {}", root.database_path().display());

    let archive = Arc::new(ArchiveStore::new(root.sermons_path()));

    let host = get_setting(&pool, "http_host")
        .await?
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = get_setting(&pool, "http_port")
        .await?
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(5780);

    let state = AppState::new(pool, archive);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!("parish-web listening on http://{}:{}", host, port);
    info!("Health check: http://{}:{}/health", host, port);

    axum::serve(listener, app).await?;

    Ok(())
}
