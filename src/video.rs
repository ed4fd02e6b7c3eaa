use crate::error::{AcquisitionError, AcquisitionResult};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Raw metadata document as emitted by the metadata tool
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RawVideoMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Duration in (possibly fractional) seconds
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub chapters: Option<Vec<RawChapter>>,
}

/// One entry of the structured chapter list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawChapter {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_time: f64,
    #[serde(default)]
    pub end_time: Option<f64>,
}

/// yt-dlp emits `null` for fields it could not fill; treat those like missing keys
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Resolves a video reference to raw structured metadata
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch_metadata(&self, url: &str) -> AcquisitionResult<RawVideoMetadata>;

    /// Short name used in log messages
    fn name(&self) -> &str;
}

/// Metadata source backed by the `yt-dlp` command line tool
#[derive(Debug, Clone)]
pub struct YtDlpSource {
    program: PathBuf,
    timeout: Duration,
    extra_args: Vec<String>,
}

impl YtDlpSource {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
            extra_args: Vec::new(),
        }
    }

    /// Additional arguments passed before `--dump-single-json`
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for YtDlpSource {
    fn default() -> Self {
        Self::new("yt-dlp", Duration::from_secs(60))
    }
}

#[async_trait]
impl MetadataSource for YtDlpSource {
    async fn fetch_metadata(&self, url: &str) -> AcquisitionResult<RawVideoMetadata> {
        debug!("Running {} for {}", self.program.display(), url);

        // The URL goes in as a single argument after `--`, never through a shell.
        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(&self.extra_args)
            .args(["--dump-single-json", "--no-warnings", "--"])
            .arg(url)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        // Dropping the output future on timeout or cancellation kills the child.
        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Err(_) => return Err(AcquisitionError::Timeout(self.timeout.as_secs())),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AcquisitionError::ToolNotFound(self.program.display().to_string()));
            }
            Ok(result) => result?,
        };

        if !output.status.success() {
            return Err(AcquisitionError::ToolFailed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let metadata: RawVideoMetadata = serde_json::from_slice(&output.stdout)?;

        info!(
            "📹 Fetched metadata: {} ({}, {:.0}s, {} structured chapters)",
            metadata.title,
            metadata.id,
            metadata.duration.unwrap_or(0.0),
            metadata.chapters.as_ref().map_or(0, |c| c.len())
        );

        Ok(metadata)
    }

    fn name(&self) -> &str {
        "yt-dlp"
    }
}

/// Whether `candidate` has the shape of a YouTube video id
pub fn is_valid_video_id(candidate: &str) -> bool {
    candidate.len() == 11
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Extract the YouTube video id from a watch, short, embed or shorts URL
pub fn extract_video_id(reference: &str) -> Option<String> {
    let parsed = Url::parse(reference.trim()).ok()?;
    let host = parsed.host_str()?;
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .unwrap_or(host);

    let candidate = match host {
        "youtu.be" => parsed.path_segments()?.next()?.to_string(),
        "youtube.com" | "music.youtube.com" | "youtube-nocookie.com" => {
            let mut segments = parsed.path_segments()?;
            match segments.next()? {
                "watch" => parsed
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned())?,
                "embed" | "shorts" | "v" | "live" => segments.next()?.to_string(),
                _ => return None,
            }
        }
        _ => return None,
    };

    is_valid_video_id(&candidate).then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id_from_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://youtube.com/watch?list=PL123&v=dQw4w9WgXcQ&t=42").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extract_video_id_from_short_and_embed_urls() {
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://m.youtube.com/shorts/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extract_video_id_rejects_invalid() {
        assert_eq!(extract_video_id("not-a-url"), None);
        assert_eq!(extract_video_id("https://example.com/watch?v=dQw4w9WgXcQ"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=short"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/channel/UC123"), None);
    }

    #[test]
    fn test_raw_metadata_parsing() {
        let json = r#"{
            "id": "abc123def45",
            "title": "Sample",
            "description": "00:00 Intro",
            "thumbnail": "https://i.ytimg.com/vi/abc123def45/hq.jpg",
            "duration": 312.4,
            "chapters": [{"title": "Intro", "start_time": 0.0, "end_time": 100.7}],
            "view_count": 10
        }"#;

        let metadata: RawVideoMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.id, "abc123def45");
        assert_eq!(metadata.duration, Some(312.4));
        assert_eq!(metadata.chapters.unwrap()[0].end_time, Some(100.7));
    }

    #[test]
    fn test_raw_metadata_with_null_chapters() {
        let metadata: RawVideoMetadata =
            serde_json::from_str(r#"{"id": "x", "title": "t", "chapters": null, "duration": null}"#).unwrap();
        assert!(metadata.chapters.is_none());
        assert!(metadata.duration.is_none());
    }

    #[test]
    fn test_raw_metadata_with_null_strings() {
        let metadata: RawVideoMetadata = serde_json::from_str(
            r#"{"id": null, "title": null, "chapters": [{"title": null, "start_time": null, "end_time": 20.0}]}"#,
        )
        .unwrap();
        assert!(metadata.id.is_empty());
        assert!(metadata.title.is_empty());
        let chapters = metadata.chapters.unwrap();
        assert!(chapters[0].title.is_empty());
        assert_eq!(chapters[0].start_time, 0.0);
    }

    #[tokio::test]
    async fn test_missing_binary_reports_tool_not_found() {
        let source = YtDlpSource::new("definitely-not-a-real-ytdlp-binary", Duration::from_secs(5));
        let err = source
            .fetch_metadata("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap_err();
        assert!(matches!(err, AcquisitionError::ToolNotFound(_)));
    }
}
