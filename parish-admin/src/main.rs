//! parish-admin - Administrative housekeeping for the church website
//!
//! Migrations, default content seeding, backups, and archive
//! reorganization. All commands are safe to re-run.

use anyhow::Result;
use clap::{Parser, Subcommand};
use parish_common::archive::{ArchiveStore, NO_DATE_BUCKET};
use parish_common::config::RootFolder;
use parish_common::db::queries::ensure_series;
use parish_common::db::{get_setting, init_database};
use std::path::PathBuf;
use tracing::info;

/// Podcast series the site has always served
const DEFAULT_SERIES: &[(&str, &str)] = &[
    ("Beyond Podcast", "Conversations that go beyond the Sunday sermon"),
    ("Biblical Interpretation", "How to read and understand the Bible"),
    ("Confessional Theology", "Walking through the church's confessions"),
    ("Membership Seminar", "An introduction to membership and life together"),
    ("What We Believe", "Core doctrines of the Christian faith"),
    ("Walking with Jesus", "Practical discipleship, one step at a time"),
];

#[derive(Parser, Debug)]
#[command(name = "parish-admin", about = "Church website housekeeping")]
struct Cli {
    /// Root folder holding the database and data documents
    #[arg(long)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize the database and apply pending schema migrations
    Migrate,
    /// Create the default podcast series if missing
    Seed,
    /// Copy the database and data documents into a timestamped backup
    Backup,
    /// Rebuild the sermon archive's year buckets and flat array
    Reorganize,
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

    info!(
        "Starting parish-admin v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root = RootFolder::resolve(cli.root.as_deref());
    root.ensure_exists()?;

    match cli.command {
        Command::Migrate => {
            // init_database creates missing tables and runs migrations
            let _pool = init_database(&root.database_path()).await?;
            info!("✓ Database schema is current");
        }
        Command::Seed => {
            let pool = init_database(&root.database_path()).await?;
            let mut tx = pool.begin().await?;
            for &(title, description) in DEFAULT_SERIES {
                let id = ensure_series(&mut tx, title, Some(description)).await?;
                info!("Series #{}: {}", id, title);
            }
            tx.commit().await?;
            info!("✓ Default podcast series present");
        }
        Command::Backup => {
            let pool = init_database(&root.database_path()).await?;
            let retention = get_setting(&pool, "backup_retention_count")
                .await?
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(3);
            drop(pool);

            let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string();
            let target = root.backups_dir().join(&stamp);
            std::fs::create_dir_all(&target)?;

            let db_path = root.database_path();
            if db_path.exists() {
                std::fs::copy(&db_path, target.join("parish.db"))?;
            }
            let mut copied = 0;
            if root.data_dir().exists() {
                for entry in std::fs::read_dir(root.data_dir())? {
                    let entry = entry?;
                    let path = entry.path();
                    if path.extension().and_then(|e| e.to_str()) == Some("json") {
                        std::fs::copy(&path, target.join(entry.file_name()))?;
                        copied += 1;
                    }
                }
            }
            info!("Backup written to {} ({} data documents)", target.display(), copied);

            prune_backups(&root.backups_dir(), retention)?;
        }
        Command::Reorganize => {
            let store = ArchiveStore::new(root.sermons_path());
            let outcome = store.merge_incoming(Vec::new())?;
            let document = outcome.document;

            info!("Reorganized {} sermons by year", document.total_sermons);
            for (year, count) in &document.year_counts {
                info!("  {}: {} sermons", year, count.count);
            }
            if let Some(bucket) = document.sermons_by_year.get(NO_DATE_BUCKET) {
                info!("  No date: {} sermons", bucket.len());
            }
        }
    }

    Ok(())
}

/// Delete the oldest backups beyond the retention count.
///
/// Backup directory names are sortable timestamps, so lexicographic order
/// is chronological.
fn prune_backups(backups_dir: &std::path::Path, retention: usize) -> Result<()> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(backups_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();

    while dirs.len() > retention {
        let oldest = dirs.remove(0);
        info!("Pruning old backup {}", oldest.display());
        std::fs::remove_dir_all(&oldest)?;
    }
    Ok(())
}
