/// On-disk cache of extracted video metadata
use super::extractor::{VideoExtractor, FALLBACK_VIDEO_ID};
use super::VideoInfo;
use crate::config::CacheConfig;
use crate::video::{extract_video_id, is_valid_video_id, MetadataSource};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Cached metadata for one video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedVideo {
    /// When the entry was written
    pub cached_at: DateTime<Utc>,
    /// Cache key for identification
    pub cache_key: String,
    /// URL the video was extracted from
    pub source_url: String,
    /// Number of chapters
    pub chapter_count: usize,
    /// Extracted video info
    pub video: VideoInfo,
}

/// Manages video cache operations
#[derive(Debug, Clone)]
pub struct VideoCacheManager {
    /// Cache directory path
    cache_dir: PathBuf,
    /// Cache TTL in hours
    cache_ttl_hours: u64,
}

impl VideoCacheManager {
    /// Create a new cache manager
    pub fn new(cache_dir: PathBuf, cache_ttl_hours: u64) -> Self {
        Self {
            cache_dir,
            cache_ttl_hours,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.cache_dir.clone(), config.ttl_hours)
    }

    /// Initialize cache directory
    pub async fn initialize(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.cache_dir).await?;
        info!("📁 Video cache directory initialized: {}", self.cache_dir.display());
        Ok(())
    }

    /// Cache key for a URL: the YouTube id when there is one, otherwise a
    /// digest of the URL itself
    pub fn generate_cache_key(url: &str) -> String {
        match extract_video_id(url) {
            Some(id) => id,
            None => format!("url_{:x}", md5::compute(url.trim().as_bytes())),
        }
    }

    /// Whether `cache_key` has a shape [`Self::generate_cache_key`] can produce
    pub fn is_valid_cache_key(cache_key: &str) -> bool {
        if is_valid_video_id(cache_key) {
            return true;
        }
        cache_key
            .strip_prefix("url_")
            .map_or(false, |digest| digest.len() == 32 && digest.chars().all(|c| c.is_ascii_hexdigit()))
    }

    /// Keys are joined into the cache directory, so anything else is refused
    fn cache_path(&self, cache_key: &str) -> Result<PathBuf> {
        if !Self::is_valid_cache_key(cache_key) {
            return Err(anyhow!("Invalid cache key: {}", cache_key));
        }
        Ok(self.cache_dir.join(format!("{}.json", cache_key)))
    }

    /// Load cached video info if valid
    pub async fn load_cached_video(&self, cache_key: &str) -> Option<CachedVideo> {
        let cache_path = match self.cache_path(cache_key) {
            Ok(path) => path,
            Err(e) => {
                warn!("{}", e);
                return None;
            }
        };

        if !cache_path.exists() {
            debug!("Cache miss: no file found for key {}", cache_key);
            return None;
        }

        match tokio::fs::read_to_string(&cache_path).await {
            Ok(content) => match serde_json::from_str::<CachedVideo>(&content) {
                Ok(entry) => {
                    if self.is_entry_valid(&entry) {
                        info!("📚 Cache hit: {} ({} chapters)", cache_key, entry.chapter_count);
                        Some(entry)
                    } else {
                        info!("⏰ Cache expired for key: {}", cache_key);
                        let _ = tokio::fs::remove_file(&cache_path).await;
                        None
                    }
                }
                Err(e) => {
                    warn!("Failed to parse cache file {}: {}", cache_path.display(), e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read cache file {}: {}", cache_path.display(), e);
                None
            }
        }
    }

    /// Save video info to cache
    pub async fn save_cached_video(&self, cache_key: &str, source_url: &str, video: &VideoInfo) -> Result<()> {
        let entry = CachedVideo {
            cached_at: Utc::now(),
            cache_key: cache_key.to_string(),
            source_url: source_url.to_string(),
            chapter_count: video.chapters.len(),
            video: video.clone(),
        };

        self.write_entry(&entry).await?;
        info!("💾 Cached {} chapters for: {}", entry.chapter_count, cache_key);
        Ok(())
    }

    async fn write_entry(&self, entry: &CachedVideo) -> Result<()> {
        let cache_path = self.cache_path(&entry.cache_key)?;
        tokio::fs::create_dir_all(&self.cache_dir).await?;
        let json_content = serde_json::to_string_pretty(entry)?;
        tokio::fs::write(cache_path, json_content).await?;
        Ok(())
    }

    /// Check if a cache entry is still valid based on TTL
    fn is_entry_valid(&self, entry: &CachedVideo) -> bool {
        self.get_entry_age_hours(entry) < self.cache_ttl_hours
    }

    fn get_entry_age_hours(&self, entry: &CachedVideo) -> u64 {
        let age = Utc::now().signed_duration_since(entry.cached_at);
        age.num_hours().max(0) as u64
    }

    async fn read_all_entries(&self) -> Result<Vec<(PathBuf, CachedVideo)>> {
        let mut found = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.cache_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                if let Ok(content) = tokio::fs::read_to_string(&path).await {
                    if let Ok(cached) = serde_json::from_str::<CachedVideo>(&content) {
                        found.push((path, cached));
                    }
                }
            }
        }

        Ok(found)
    }

    /// Clean up expired cache files
    pub async fn cleanup_expired_cache(&self) -> Result<usize> {
        let mut cleaned_count = 0;

        for (path, cached) in self.read_all_entries().await? {
            if !self.is_entry_valid(&cached) && tokio::fs::remove_file(&path).await.is_ok() {
                cleaned_count += 1;
                debug!("🗑️ Removed expired cache: {}", path.display());
            }
        }

        if cleaned_count > 0 {
            info!("🧹 Cleaned up {} expired cache files", cleaned_count);
        }

        Ok(cleaned_count)
    }

    /// Get cache statistics
    pub async fn get_cache_stats(&self) -> Result<CacheStats> {
        let mut stats = CacheStats::default();

        for (_, cached) in self.read_all_entries().await? {
            stats.total_files += 1;
            if self.is_entry_valid(&cached) {
                stats.valid_files += 1;
                stats.total_chapters += cached.chapter_count;
            } else {
                stats.expired_files += 1;
            }
        }

        Ok(stats)
    }

    /// Force invalidate a specific cache entry by key
    pub async fn invalidate_cache(&self, cache_key: &str) -> Result<bool> {
        let cache_path = self.cache_path(cache_key)?;

        if cache_path.exists() {
            tokio::fs::remove_file(&cache_path).await?;
            info!("🗑️ Invalidated cache for key: {}", cache_key);
            Ok(true)
        } else {
            debug!("Cache file not found for key: {}", cache_key);
            Ok(false)
        }
    }

    /// Remove every cached entry
    pub async fn clear_all_cache(&self) -> Result<usize> {
        let mut cleared_count = 0;
        let mut entries = tokio::fs::read_dir(&self.cache_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") && tokio::fs::remove_file(&path).await.is_ok() {
                cleared_count += 1;
                debug!("🗑️ Removed cache file: {}", path.display());
            }
        }

        if cleared_count > 0 {
            info!("🧹 Cleared {} cache files", cleared_count);
        }

        Ok(cleared_count)
    }

    /// List all cached videos, newest first
    pub async fn list_cached_videos(&self) -> Result<Vec<CachedVideoSummary>> {
        let mut videos: Vec<CachedVideoSummary> = self
            .read_all_entries()
            .await?
            .into_iter()
            .map(|(_, cached)| CachedVideoSummary {
                is_valid: self.is_entry_valid(&cached),
                age_hours: self.get_entry_age_hours(&cached),
                cache_key: cached.cache_key,
                title: cached.video.title,
                source_url: cached.source_url,
                chapter_count: cached.chapter_count,
                cached_at: cached.cached_at,
            })
            .collect();

        videos.sort_by(|a, b| b.cached_at.cmp(&a.cached_at));
        Ok(videos)
    }
}

/// Cache statistics
#[derive(Debug, Default)]
pub struct CacheStats {
    pub total_files: usize,
    pub valid_files: usize,
    pub expired_files: usize,
    pub total_chapters: usize,
}

/// Information about a cached video
#[derive(Debug, Clone)]
pub struct CachedVideoSummary {
    pub cache_key: String,
    pub title: String,
    pub source_url: String,
    pub chapter_count: usize,
    pub is_valid: bool,
    pub age_hours: u64,
    pub cached_at: DateTime<Utc>,
}

/// Extractor that consults the video cache before running the tiers
#[derive(Debug, Clone)]
pub struct CachedExtractor<S> {
    extractor: VideoExtractor<S>,
    cache: Option<VideoCacheManager>,
}

impl<S: MetadataSource> CachedExtractor<S> {
    pub fn new(extractor: VideoExtractor<S>, cache: Option<VideoCacheManager>) -> Self {
        Self { extractor, cache }
    }

    /// Extract video info, serving from and filling the cache.
    ///
    /// Placeholder results are never cached. Cache errors are logged and
    /// otherwise ignored.
    pub async fn extract_info(&self, url: &str) -> VideoInfo {
        let Some(cache) = &self.cache else {
            return self.extractor.extract_info(url).await;
        };

        let cache_key = VideoCacheManager::generate_cache_key(url);
        if let Some(cached) = cache.load_cached_video(&cache_key).await {
            return cached.video;
        }

        let info = self.extractor.extract_info(url).await;

        if info.id != FALLBACK_VIDEO_ID {
            if let Err(e) = cache.save_cached_video(&cache_key, url, &info).await {
                warn!("Failed to cache video {}: {}", cache_key, e);
            }
        }

        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn sample_video() -> VideoInfo {
        VideoInfo {
            id: "dQw4w9WgXcQ".to_string(),
            title: "Sample".to_string(),
            duration_seconds: 300,
            chapters: crate::chapters::parse_chapters_from_description("00:00 A\n01:00 B", 300),
            ..VideoInfo::default()
        }
    }

    #[test]
    fn test_cache_key_uses_video_id() {
        assert_eq!(
            VideoCacheManager::generate_cache_key("https://youtu.be/dQw4w9WgXcQ"),
            "dQw4w9WgXcQ"
        );

        let key = VideoCacheManager::generate_cache_key("https://vimeo.com/12345");
        assert!(key.starts_with("url_"));
        assert_eq!(key, VideoCacheManager::generate_cache_key("https://vimeo.com/12345"));
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let cache = VideoCacheManager::new(dir.path().to_path_buf(), 24);
        cache.initialize().await.unwrap();

        let video = sample_video();
        cache.save_cached_video("dQw4w9WgXcQ", "https://youtu.be/dQw4w9WgXcQ", &video).await.unwrap();

        let loaded = cache.load_cached_video("dQw4w9WgXcQ").await.unwrap();
        assert_eq!(loaded.video, video);
        assert_eq!(loaded.chapter_count, 2);
    }

    #[tokio::test]
    async fn test_expired_entry_is_dropped() {
        let dir = TempDir::new().unwrap();
        let cache = VideoCacheManager::new(dir.path().to_path_buf(), 24);
        cache.initialize().await.unwrap();

        let entry = CachedVideo {
            cached_at: Utc::now() - Duration::hours(25),
            cache_key: "oldVideo123".to_string(),
            source_url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            chapter_count: 0,
            video: VideoInfo::default(),
        };
        cache.write_entry(&entry).await.unwrap();

        let stats = cache.get_cache_stats().await.unwrap();
        assert_eq!(stats.expired_files, 1);

        assert!(cache.load_cached_video("oldVideo123").await.is_none());
        assert!(!dir.path().join("oldVideo123.json").exists());
    }

    #[tokio::test]
    async fn test_cleanup_only_removes_expired() {
        let dir = TempDir::new().unwrap();
        let cache = VideoCacheManager::new(dir.path().to_path_buf(), 24);
        cache.initialize().await.unwrap();

        cache.save_cached_video("freshVideo1", "https://youtu.be/dQw4w9WgXcQ", &sample_video()).await.unwrap();
        cache
            .write_entry(&CachedVideo {
                cached_at: Utc::now() - Duration::hours(48),
                cache_key: "staleVideo1".to_string(),
                source_url: String::new(),
                chapter_count: 0,
                video: VideoInfo::default(),
            })
            .await
            .unwrap();

        assert_eq!(cache.cleanup_expired_cache().await.unwrap(), 1);

        let listed = cache.list_cached_videos().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].cache_key, "freshVideo1");
        assert!(listed[0].is_valid);
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let dir = TempDir::new().unwrap();
        let cache = VideoCacheManager::new(dir.path().to_path_buf(), 24);
        cache.initialize().await.unwrap();

        cache.save_cached_video("aaaaaaaaaaa", "u", &sample_video()).await.unwrap();
        cache.save_cached_video("bbbbbbbbbbb", "u", &sample_video()).await.unwrap();

        assert!(cache.invalidate_cache("aaaaaaaaaaa").await.unwrap());
        assert!(!cache.invalidate_cache("aaaaaaaaaaa").await.unwrap());
        assert_eq!(cache.clear_all_cache().await.unwrap(), 1);
        assert_eq!(cache.get_cache_stats().await.unwrap().total_files, 0);
    }

    #[test]
    fn test_cache_key_validation() {
        assert!(VideoCacheManager::is_valid_cache_key("dQw4w9WgXcQ"));
        assert!(VideoCacheManager::is_valid_cache_key(&VideoCacheManager::generate_cache_key(
            "https://vimeo.com/12345"
        )));
        assert!(!VideoCacheManager::is_valid_cache_key("../foo"));
        assert!(!VideoCacheManager::is_valid_cache_key("url_../../etc/passwd"));
        assert!(!VideoCacheManager::is_valid_cache_key(""));
    }

    #[tokio::test]
    async fn test_invalidate_rejects_path_outside_cache_dir() {
        let root = TempDir::new().unwrap();
        let cache_dir = root.path().join("cache");
        let cache = VideoCacheManager::new(cache_dir, 24);
        cache.initialize().await.unwrap();

        let outside = root.path().join("foo.json");
        std::fs::write(&outside, "{}").unwrap();

        assert!(cache.invalidate_cache("../foo").await.is_err());
        assert!(outside.exists());
        assert!(cache.load_cached_video("../foo").await.is_none());
        assert!(cache.save_cached_video("../foo", "u", &sample_video()).await.is_err());
    }
}
