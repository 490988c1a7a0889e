pub mod error;
pub mod subtitles;
pub mod types;

pub use error::ClientError;
pub use types::{
    ContentType, MediaKind, MediaRecord, SubtitleTrack, TimeWindow, VideoSource, parse_year,
};
