use anyhow::{anyhow, Result};
use chapter_tracker::chapters::VideoCacheManager;
use chapter_tracker::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "cache-manager")]
#[command(about = "Video metadata cache management utility")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Cache directory (defaults to the configured one)
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all cached videos
    List,
    /// Get cache statistics
    Stats,
    /// Invalidate cache for a video id or URL
    Invalidate {
        /// Video id or URL
        key: String,
    },
    /// Clear all cache entries
    Clear,
    /// Clean up expired cache entries
    Cleanup,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();

    let cache_dir = cli.cache_dir.unwrap_or(config.cache.cache_dir);
    let cache_manager = VideoCacheManager::new(cache_dir, config.cache.ttl_hours);
    cache_manager.initialize().await?;

    match cli.command {
        Commands::List => {
            let videos = cache_manager.list_cached_videos().await?;

            if videos.is_empty() {
                info!("📭 No cached videos found");
                return Ok(());
            }

            info!("📚 Cached videos ({} total):", videos.len());
            for video in videos {
                let status = if video.is_valid { "✅ Valid" } else { "⏰ Expired" };
                info!(
                    "  {} | {} | {} chapters | {}h old | {}",
                    video.cache_key, video.title, video.chapter_count, video.age_hours, status
                );
                info!("    URL: {}", video.source_url);
            }
        }
        Commands::Stats => {
            let stats = cache_manager.get_cache_stats().await?;
            info!("📊 Cache Statistics:");
            info!("  Total files: {}", stats.total_files);
            info!("  Valid files: {}", stats.valid_files);
            info!("  Expired files: {}", stats.expired_files);
            info!("  Total cached chapters: {}", stats.total_chapters);
        }
        Commands::Invalidate { key } => {
            let cache_key = if key.contains("://") {
                VideoCacheManager::generate_cache_key(&key)
            } else {
                key
            };
            if !VideoCacheManager::is_valid_cache_key(&cache_key) {
                return Err(anyhow!("Not a video id or cache key: {}", cache_key));
            }

            if cache_manager.invalidate_cache(&cache_key).await? {
                info!("✅ Invalidated cache for: {}", cache_key);
            } else {
                info!("❓ No cache entry found for: {}", cache_key);
            }
        }
        Commands::Clear => {
            let count = cache_manager.clear_all_cache().await?;
            info!("🧹 Cleared {} cache entries", count);
        }
        Commands::Cleanup => {
            let count = cache_manager.cleanup_expired_cache().await?;
            info!("🧹 Cleaned up {} expired entries", count);
        }
    }

    Ok(())
}
