use anyhow::{anyhow, Result};
use chapter_tracker::chapters::{parse_chapters_from_description, CachedExtractor, VideoCacheManager, VideoExtractor};
use chapter_tracker::{extract_video_id, format_duration, Config};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chapter-tracker")]
#[command(version, about = "Extract and parse video chapters")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to the standard search locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract video info and chapters for one or more URLs
    Extract {
        /// Video URLs
        #[arg(required = true)]
        urls: Vec<String>,

        /// Skip the metadata cache
        #[arg(long)]
        no_cache: bool,
    },
    /// Parse a chapter text block (file or stdin) into chapters
    Parse {
        /// File holding the chapter text; reads stdin when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Total video duration in seconds
        #[arg(short, long, default_value_t = 0)]
        duration: u64,

        /// Print a human-readable table instead of JSON
        #[arg(long)]
        table: bool,
    },
    /// Print the YouTube video id of a URL
    VideoId {
        url: String,
    },
}

fn init_logging(level: &str, verbose: bool) {
    let level = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chapter_tracker={},warn", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", output);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            eprintln!("Failed to load config, using defaults: {}", e);
            Config::default()
        }),
    };

    init_logging(&config.logging.log_level, cli.verbose);
    config.validate()?;

    match cli.command {
        Commands::Extract { urls, no_cache } => {
            let extractor = VideoExtractor::from_config(&config.extractor);

            let cache = if config.cache.enable_caching && !no_cache {
                let manager = VideoCacheManager::from_config(&config.cache);
                match manager.initialize().await {
                    Ok(()) => Some(manager),
                    Err(e) => {
                        warn!("Cache unavailable, continuing without it: {}", e);
                        None
                    }
                }
            } else {
                None
            };

            let extractor = CachedExtractor::new(extractor, cache);
            info!("🚀 Extracting {} video(s)", urls.len());

            let results = futures::future::join_all(urls.iter().map(|url| extractor.extract_info(url))).await;

            for (url, info) in urls.iter().zip(&results) {
                if info.has_chapters() {
                    info!("✅ {}: {} chapters", url, info.chapters.len());
                } else {
                    warn!("📭 {}: no chapters found, manual entry needed", url);
                }
            }

            if results.len() == 1 {
                print_json(&results[0], cli.pretty)?;
            } else {
                print_json(&results, cli.pretty)?;
            }
        }
        Commands::Parse { file, duration, table } => {
            let text = match file {
                Some(path) => tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?,
                None => {
                    let mut buffer = String::new();
                    tokio::io::stdin().read_to_string(&mut buffer).await?;
                    buffer
                }
            };

            let chapters = parse_chapters_from_description(&text, duration);
            info!("📝 Parsed {} chapters", chapters.len());

            if table {
                for chapter in &chapters {
                    println!(
                        "{:>3}  {:>8} - {:<8} ({:>8})  {}",
                        chapter.chapter_number,
                        format_duration(chapter.start_time_seconds as i64),
                        format_duration(chapter.end_time_seconds.unwrap_or(0) as i64),
                        chapter
                            .length_seconds()
                            .map(|length| format_duration(length as i64))
                            .unwrap_or_else(|| "-".to_string()),
                        chapter.title
                    );
                }
            } else {
                print_json(&chapters, cli.pretty)?;
            }
        }
        Commands::VideoId { url } => match extract_video_id(&url) {
            Some(id) => println!("{}", id),
            None => return Err(anyhow!("Not a recognized YouTube URL: {}", url)),
        },
    }

    Ok(())
}
