/// Tiered video metadata extraction
use super::description::parse_chapters_from_description;
use super::{Chapter, VideoInfo};
use crate::config::ExtractorConfig;
use crate::error::{AcquisitionError, AcquisitionResult};
use crate::video::{MetadataSource, RawVideoMetadata, YtDlpSource};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Id reported when no tier could identify the video
pub const FALLBACK_VIDEO_ID: &str = "unknown";

/// Extracts normalized video info through ordered fallback tiers.
///
/// Tier 1 asks the [`MetadataSource`] for structured metadata, tier 2 is the
/// oEmbed lookup and tier 3 is the placeholder from [`fallback_info`]. The
/// extractor keeps no per-call state, so one instance can serve concurrent
/// requests.
#[derive(Debug, Clone)]
pub struct VideoExtractor<S = YtDlpSource> {
    source: S,
    parse_description_fallback: bool,
}

impl VideoExtractor<YtDlpSource> {
    /// Create an extractor backed by `yt-dlp` from config
    pub fn from_config(config: &ExtractorConfig) -> Self {
        let source = YtDlpSource::new(&config.ytdlp_path, Duration::from_secs(config.timeout_seconds))
            .with_extra_args(config.extra_args.clone());

        Self::new(source).with_description_fallback(config.parse_description_fallback)
    }
}

impl<S: MetadataSource> VideoExtractor<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            parse_description_fallback: true,
        }
    }

    /// Enable or disable parsing the description when no structured chapters exist
    pub fn with_description_fallback(mut self, enabled: bool) -> Self {
        self.parse_description_fallback = enabled;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Extract video info for `url`. Never fails: acquisition errors are
    /// logged and the next tier is tried, ending at the placeholder.
    pub async fn extract_info(&self, url: &str) -> VideoInfo {
        match self.extract_structured(url).await {
            Ok(info) => return info,
            Err(e) => warn!("⚠️ Tier 1 ({}) failed for {}: {}", self.source.name(), url, e),
        }

        match self.extract_with_oembed(url).await {
            Ok(info) => info,
            Err(e) => {
                warn!("⚠️ Tier 2 failed for {}: {}, using fallback", url, e);
                fallback_info(url)
            }
        }
    }

    /// Tier 1: structured metadata from the source
    pub async fn extract_structured(&self, url: &str) -> AcquisitionResult<VideoInfo> {
        let metadata = self.source.fetch_metadata(url).await?;
        Ok(normalize_metadata(metadata, self.parse_description_fallback))
    }

    /// Tier 2: oEmbed lookup.
    ///
    /// Not implemented yet. It always fails so the placeholder tier stays
    /// reachable; a real lookup plugs in here.
    pub async fn extract_with_oembed(&self, url: &str) -> AcquisitionResult<VideoInfo> {
        debug!("oEmbed lookup requested for {}", url);
        Err(AcquisitionError::Unavailable("oEmbed lookup".to_string()))
    }
}

/// Tier 3: minimal valid info when every other tier failed
pub fn fallback_info(url: &str) -> VideoInfo {
    debug!("Producing placeholder info for {}", url);
    VideoInfo {
        id: FALLBACK_VIDEO_ID.to_string(),
        title: String::new(),
        description: String::new(),
        thumbnail_url: String::new(),
        duration_seconds: 0,
        chapters: Vec::new(),
    }
}

fn floor_seconds(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.floor() as u64
    } else {
        0
    }
}

/// Convert raw metadata into [`VideoInfo`].
///
/// Structured chapters map straight across with floored times. Without them,
/// and with `parse_description` set, the description is parsed for
/// timestamps. If neither yields chapters the list stays empty.
pub fn normalize_metadata(metadata: RawVideoMetadata, parse_description: bool) -> VideoInfo {
    let duration_seconds = metadata.duration.map(floor_seconds).unwrap_or(0);
    let description = metadata.description.unwrap_or_default();

    let mut chapters: Vec<Chapter> = metadata
        .chapters
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let chapter_number = index as u32 + 1;
            let title = match raw.title.trim() {
                "" => format!("Chapter {}", chapter_number),
                title => title.to_string(),
            };
            Chapter {
                chapter_number,
                title,
                start_time_seconds: floor_seconds(raw.start_time),
                end_time_seconds: raw.end_time.map(floor_seconds),
            }
        })
        .collect();

    if chapters.is_empty() {
        if parse_description && !description.trim().is_empty() {
            let parsed = parse_chapters_from_description(&description, duration_seconds);
            if parsed.is_empty() {
                info!("📭 No chapters in description for {}", metadata.id);
            } else {
                info!("📝 Parsed {} chapters from description for {}", parsed.len(), metadata.id);
                chapters = parsed;
            }
        }
    } else {
        fill_missing_end_times(&mut chapters, duration_seconds);
        info!("✅ Found {} structured chapters for {}", chapters.len(), metadata.id);
    }

    VideoInfo {
        id: metadata.id,
        title: metadata.title,
        description,
        thumbnail_url: metadata.thumbnail.unwrap_or_default(),
        duration_seconds,
        chapters,
    }
}

/// Structured entries occasionally omit `end_time`; close them at the next
/// chapter's start or at the video's end.
fn fill_missing_end_times(chapters: &mut [Chapter], duration_seconds: u64) {
    for index in 0..chapters.len() {
        if chapters[index].end_time_seconds.is_none() {
            let end = chapters
                .get(index + 1)
                .map(|next| next.start_time_seconds)
                .unwrap_or(duration_seconds);
            chapters[index].end_time_seconds = Some(end);
        }
    }
}
