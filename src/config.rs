use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the chapter tracker
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Metadata extraction settings
    pub extractor: ExtractorConfig,

    /// Video metadata cache settings
    pub cache: CacheConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Path or name of the yt-dlp executable
    pub ytdlp_path: PathBuf,

    /// Timeout for one metadata tool invocation (seconds)
    pub timeout_seconds: u64,

    /// Parse the description for timestamps when no structured chapters exist
    pub parse_description_fallback: bool,

    /// Extra arguments for the metadata tool (cookies, proxies, ...)
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable the on-disk metadata cache
    pub enable_caching: bool,

    /// Cache directory
    pub cache_dir: PathBuf,

    /// Cache TTL in hours
    pub ttl_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level for the chapter_tracker target
    pub log_level: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: PathBuf::from("yt-dlp"),
            timeout_seconds: 60,
            parse_description_fallback: true,
            extra_args: Vec::new(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enable_caching: true,
            cache_dir: PathBuf::from("video_cache"),
            ttl_hours: 24,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        // Try to load from various locations
        let config_paths = [
            "chapter-tracker.toml",
            "config/chapter-tracker.toml",
            "/etc/chapter-tracker/config.toml",
        ];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str::<Config>(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return Ok(config.with_env_overrides());
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Load a configuration file from an explicit path
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config {}: {}", path.display(), e))?;
        let config: Config = toml::from_str(&config_str)?;
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config.with_env_overrides())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::default().with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(path) = std::env::var("CHAPTER_TRACKER_YTDLP_PATH") {
            self.extractor.ytdlp_path = PathBuf::from(path);
        }

        if let Ok(timeout) = std::env::var("CHAPTER_TRACKER_TIMEOUT") {
            self.extractor.timeout_seconds = timeout.parse().unwrap_or(self.extractor.timeout_seconds);
        }

        if let Ok(cache_dir) = std::env::var("CHAPTER_TRACKER_CACHE_DIR") {
            self.cache.cache_dir = PathBuf::from(cache_dir);
        }

        if let Ok(ttl) = std::env::var("CHAPTER_TRACKER_CACHE_TTL_HOURS") {
            self.cache.ttl_hours = ttl.parse().unwrap_or(self.cache.ttl_hours);
        }

        if let Ok(log_level) = std::env::var("CHAPTER_TRACKER_LOG_LEVEL") {
            self.logging.log_level = log_level;
        }

        self
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.extractor.timeout_seconds == 0 {
            return Err(anyhow!("extractor.timeout_seconds must be greater than 0"));
        }

        if self.extractor.ytdlp_path.as_os_str().is_empty() {
            return Err(anyhow!("extractor.ytdlp_path must not be empty"));
        }

        if self.cache.enable_caching && self.cache.ttl_hours == 0 {
            return Err(anyhow!("cache.ttl_hours must be greater than 0 when caching is enabled"));
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Chapter Tracker Configuration:\n\
            - Metadata Tool: {}\n\
            - Tool Timeout: {}s\n\
            - Description Fallback: {}\n\
            - Caching Enabled: {}\n\
            - Cache Directory: {}\n\
            - Cache TTL: {}h",
            self.extractor.ytdlp_path.display(),
            self.extractor.timeout_seconds,
            self.extractor.parse_description_fallback,
            self.cache.enable_caching,
            self.cache.cache_dir.display(),
            self.cache.ttl_hours
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_ytdlp_path(mut self, path: PathBuf) -> Self {
        self.config.extractor.ytdlp_path = path;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.config.extractor.timeout_seconds = seconds;
        self
    }

    pub fn with_cache_dir(mut self, dir: PathBuf) -> Self {
        self.config.cache.cache_dir = dir;
        self
    }

    pub fn with_cache_ttl(mut self, hours: u64) -> Self {
        self.config.cache.ttl_hours = hours;
        self
    }

    pub fn enable_caching(mut self, enable: bool) -> Self {
        self.config.cache.enable_caching = enable;
        self
    }

    pub fn enable_description_fallback(mut self, enable: bool) -> Self {
        self.config.extractor.parse_description_fallback = enable;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
