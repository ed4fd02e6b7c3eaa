/// Chapter extraction and parsing module
///
/// Turns a video's metadata (a structured chapter list or freeform description
/// text) into an ordered list of chapters with start and end boundaries.

pub mod timestamp;
pub mod title;
pub mod description;
pub mod extractor;
pub mod cache;

// Re-export main types
pub use timestamp::{format_duration, parse_timestamp, TimestampToken};
pub use title::sanitize_title;
pub use description::{parse_chapters, parse_chapters_from_description};
pub use extractor::{fallback_info, normalize_metadata, VideoExtractor, FALLBACK_VIDEO_ID};
pub use cache::{CachedExtractor, VideoCacheManager};

use serde::{Deserialize, Serialize};

/// A named, time-bounded segment of a video
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// 1-based position in the chapter list
    pub chapter_number: u32,
    /// Chapter title, never empty
    pub title: String,
    /// Start offset in whole seconds
    pub start_time_seconds: u64,
    /// End offset in whole seconds, `None` until boundaries are derived
    pub end_time_seconds: Option<u64>,
}

impl Chapter {
    pub fn new(chapter_number: u32, title: impl Into<String>, start_time_seconds: u64) -> Self {
        Self {
            chapter_number,
            title: title.into(),
            start_time_seconds,
            end_time_seconds: None,
        }
    }

    /// Length of the chapter in seconds, if the end is known and not before the start
    pub fn length_seconds(&self) -> Option<u64> {
        self.end_time_seconds
            .and_then(|end| end.checked_sub(self.start_time_seconds))
    }
}

/// Normalized video metadata handed to the persistence layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub duration_seconds: u64,
    /// Ordered chapters, empty when none could be found
    pub chapters: Vec<Chapter>,
}

impl VideoInfo {
    pub fn has_chapters(&self) -> bool {
        !self.chapters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_serializes_camel_case() {
        let mut chapter = Chapter::new(1, "Intro", 0);
        chapter.end_time_seconds = Some(90);

        let json = serde_json::to_value(&chapter).unwrap();
        assert_eq!(json["chapterNumber"], 1);
        assert_eq!(json["startTimeSeconds"], 0);
        assert_eq!(json["endTimeSeconds"], 90);
    }

    #[test]
    fn test_chapter_length() {
        let mut chapter = Chapter::new(2, "Topic", 90);
        assert_eq!(chapter.length_seconds(), None);

        chapter.end_time_seconds = Some(225);
        assert_eq!(chapter.length_seconds(), Some(135));

        // Out-of-order source text can produce an end before the start
        chapter.end_time_seconds = Some(30);
        assert_eq!(chapter.length_seconds(), None);
    }

    #[test]
    fn test_video_info_default_has_no_chapters() {
        let info = VideoInfo::default();
        assert!(!info.has_chapters());
        assert_eq!(info.duration_seconds, 0);
    }
}
