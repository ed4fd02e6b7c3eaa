/// Chapter Tracker - chapter extraction engine
///
/// Turns a video reference into normalized video info with an ordered,
/// gapless chapter list, using structured metadata when available and
/// falling back to parsing timestamps out of the description.

pub mod chapters;
pub mod config;
pub mod error;
pub mod video;

// Re-export main types for easy access
pub use crate::config::Config;
pub use crate::error::AcquisitionError;
pub use crate::video::{extract_video_id, MetadataSource, RawChapter, RawVideoMetadata, YtDlpSource};
pub use crate::chapters::{
    fallback_info, format_duration, parse_chapters_from_description, parse_timestamp, CachedExtractor,
    Chapter, VideoCacheManager, VideoExtractor, VideoInfo,
};
