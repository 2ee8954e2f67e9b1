//! parish-ingest - Data importers for the church website
//!
//! Each subcommand converts one external source (spreadsheet export,
//! YouTube title list, podcast RSS feed, curated JSON seed file) into
//! database rows or archive records. Every importer is idempotent:
//! re-running one after a failure is the retry mechanism.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use parish_common::archive::ArchiveStore;
use parish_common::config::RootFolder;
use parish_common::db::models::SermonRow;
use parish_common::db::queries::{self, NewEpisode};
use parish_common::db::{get_setting, init_database};
use parish_ingest::seed;
use parish_ingest::sources::{podcast, tsv, youtube};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "parish-ingest", about = "Church website data importers")]
struct Cli {
    /// Root folder holding the database and data documents
    #[arg(long)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a historical sermon archive spreadsheet export
    Archive {
        /// Tab- or multi-space-separated input file with a header row
        input: PathBuf,
    },
    /// Import sermons from a list of YouTube video titles (one per line)
    Youtube {
        input: PathBuf,
    },
    /// Fetch a podcast RSS feed into the podcast episode tables
    Podcast {
        /// Feed URL; defaults to the podcast_rss_url setting
        #[arg(long)]
        url: Option<String>,
        /// Series title the episodes belong to
        #[arg(long)]
        series: String,
        /// Series description used when the series is created
        #[arg(long)]
        description: Option<String>,
    },
    /// Import a curated JSON seed file into the database
    Seed {
        #[command(subcommand)]
        kind: SeedKind,
    },
    /// Mirror dated archive records into the sermons database table
    SyncDb,
}

#[derive(Subcommand, Debug)]
enum SeedKind {
    /// Announcements array, matched by title
    Announcements { file: PathBuf },
    /// Gallery image array, matched by URL
    Gallery { file: PathBuf },
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
        "Starting parish-ingest v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root = RootFolder::resolve(cli.root.as_deref());
    root.ensure_exists()?;
    let store = ArchiveStore::new(root.sermons_path());

    match cli.command {
        Command::Archive { input } => {
            let text = std::fs::read_to_string(&input)?;
            let records = tsv::parse_archive(&text);
            info!("Parsed {} archive entries from {}", records.len(), input.display());
            report_merge(&store.merge_incoming(records)?);
        }
        Command::Youtube { input } => {
            let text = std::fs::read_to_string(&input)?;
            let records = youtube::parse_title_list(&text);
            info!("Parsed {} video titles from {}", records.len(), input.display());
            report_merge(&store.merge_incoming(records)?);
        }
        Command::Podcast { url, series, description } => {
            let pool = init_database(&root.database_path()).await?;

            let url = match url {
                Some(url) => url,
                None => get_setting(&pool, "podcast_rss_url")
                    .await?
                    .filter(|u| !u.is_empty())
                    .ok_or_else(|| {
                        anyhow::anyhow!("No feed URL given and podcast_rss_url is not configured")
                    })?,
            };
            let user_agent = get_setting(&pool, "ingest_user_agent")
                .await?
                .unwrap_or_else(|| "parish-ingest".to_string());
            let timeout_ms = get_setting(&pool, "ingest_timeout_ms")
                .await?
                .and_then(|t| t.parse::<u64>().ok())
                .unwrap_or(10_000);

            let episodes = podcast::fetch_feed(&url, &user_agent, timeout_ms).await?;

            let mut added = 0;
            let mut skipped = 0;
            let mut tx = pool.begin().await?;
            let series_id =
                queries::ensure_series(&mut tx, &series, description.as_deref()).await?;
            for episode in episodes {
                if queries::episode_exists(&mut tx, series_id, &episode.title).await? {
                    skipped += 1;
                    continue;
                }
                queries::insert_episode(
                    &mut tx,
                    &NewEpisode {
                        series_id,
                        title: episode.title,
                        link: episode.link,
                        listen_url: episode.audio_url,
                        date_added: episode.published,
                        podcast_thumbnail_url: episode.image_url,
                        ..Default::default()
                    },
                )
                .await?;
                added += 1;
            }
            tx.commit().await?;
            info!("Podcast sync complete: {} added, {} already present", added, skipped);
        }
        Command::Seed { kind } => {
            let pool = init_database(&root.database_path()).await?;
            let stats = match kind {
                SeedKind::Announcements { file } => {
                    seed::import_announcements(&pool, &file).await?
                }
                SeedKind::Gallery { file } => seed::import_gallery(&pool, &file).await?,
            };
            info!(
                "Seed import complete: {} added, {} updated, {} skipped",
                stats.added, stats.updated, stats.skipped
            );
        }
        Command::SyncDb => {
            let pool = init_database(&root.database_path()).await?;
            let document = store.load()?;

            let mut synced = 0;
            let mut undated = 0;
            let mut tx = pool.begin().await?;
            for record in &document.sermons {
                let Ok(date) = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d") else {
                    undated += 1;
                    continue;
                };
                let row = SermonRow {
                    id: record.id.clone(),
                    title: record.title.clone(),
                    author: record.author.clone(),
                    scripture: non_empty(&record.scripture),
                    date,
                    spotify_url: non_empty(&record.spotify_url),
                    youtube_url: non_empty(&record.youtube_url),
                    apple_podcasts_url: non_empty(&record.apple_podcasts_url),
                    podcast_thumbnail_url: non_empty(&record.podcast_thumbnail_url),
                };
                queries::upsert_sermon(&mut tx, &row).await?;
                synced += 1;
            }
            tx.commit().await?;

            if undated > 0 {
                warn!("{} undated archive records were not mirrored", undated);
            }
            info!("Mirrored {} archive records into the sermons table", synced);
        }
    }

    Ok(())
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn report_merge(outcome: &parish_common::archive::MergeOutcome) {
    for record in &outcome.skipped {
        info!("Skipped duplicate: {} ({})", record.title, record.date);
    }
    info!(
        "Merge complete: {} added, {} skipped, {} total sermons",
        outcome.added,
        outcome.skipped.len(),
        outcome.document.total_sermons
    );
}
