use serde::{Deserialize, Serialize};

/// Kind of title a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
}

impl MediaKind {
    /// Path segment / `mediaType` value used by the catalog and source APIs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "tv",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(Self::Movie),
            "tv" | "series" => Some(Self::Series),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content filter for trending and search queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Movie,
    Tv,
    All,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
            Self::All => "all",
        }
    }

    /// The kind used to parse list elements; `None` means each element
    /// carries its own `media_type`.
    pub fn media_kind(self) -> Option<MediaKind> {
        match self {
            Self::Movie => Some(MediaKind::Movie),
            Self::Tv => Some(MediaKind::Series),
            Self::All => None,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trending window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    Day,
    Week,
}

impl TimeWindow {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One playable stream for a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSource {
    /// Free-text label such as "1080p" or "Unknown".
    pub quality: String,
    pub url: String,
}

impl VideoSource {
    pub fn new(quality: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            quality: quality.into(),
            url: url.into(),
        }
    }
}

/// One external subtitle file for a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    pub url: String,
    /// Short code, e.g. "en".
    pub lang: String,
    /// Display name, e.g. "English".
    pub language: String,
}

impl SubtitleTrack {
    pub fn new(
        url: impl Into<String>,
        lang: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            lang: lang.into(),
            language: language.into(),
        }
    }
}

/// A browsable or playable title.
///
/// Produced by the catalog client on parse, enriched in place by the source
/// resolver, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: String,
    pub external_id: Option<String>,
    pub kind: MediaKind,

    pub title: String,
    pub synopsis: String,
    pub release_year: i32,
    pub rating: f32,
    pub vote_count: u32,
    pub tagline: Option<String>,
    pub status: Option<String>,
    pub runtime: Option<String>,
    pub genres: Vec<String>,

    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub hero_url: Option<String>,
    pub card_url: Option<String>,

    // Series only. `title` and `release_year` stay the series' own values;
    // the episode's name lives in `episode_title`.
    pub season: Option<String>,
    pub episode: Option<String>,
    pub episode_title: Option<String>,

    pub video_sources: Vec<VideoSource>,
    pub subtitles: Vec<SubtitleTrack>,
    pub video_url: Option<String>,
    pub hls_url: Option<String>,
    pub dash_url: Option<String>,

    pub from_catalog: bool,
    pub from_resolver: bool,
}

impl MediaRecord {
    /// An empty record with only identity set.
    pub fn new(id: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            id: id.into(),
            external_id: None,
            kind,
            title: String::new(),
            synopsis: String::new(),
            release_year: 0,
            rating: 0.0,
            vote_count: 0,
            tagline: None,
            status: None,
            runtime: None,
            genres: Vec::new(),
            poster_url: None,
            backdrop_url: None,
            hero_url: None,
            card_url: None,
            season: None,
            episode: None,
            episode_title: None,
            video_sources: Vec::new(),
            subtitles: Vec::new(),
            video_url: None,
            hls_url: None,
            dash_url: None,
            from_catalog: false,
            from_resolver: false,
        }
    }

    /// Hero > backdrop > card > poster.
    pub fn primary_image_url(&self) -> Option<&str> {
        [
            &self.hero_url,
            &self.backdrop_url,
            &self.card_url,
            &self.poster_url,
        ]
        .into_iter()
        .find_map(|u| non_empty(u))
    }

    pub fn has_valid_video_sources(&self) -> bool {
        self.video_sources.iter().any(|s| !s.url.is_empty())
            || non_empty(&self.hls_url).is_some()
            || non_empty(&self.dash_url).is_some()
            || non_empty(&self.video_url).is_some()
    }

    /// First 1080p/720p source, then the first source, then the legacy URLs.
    pub fn best_video_url(&self) -> Option<&str> {
        let mut playable = self.video_sources.iter().filter(|s| !s.url.is_empty());
        let preferred = playable
            .clone()
            .find(|s| s.quality == "1080p" || s.quality == "720p");

        if let Some(s) = preferred.or_else(|| playable.next()) {
            return Some(s.url.as_str());
        }

        non_empty(&self.hls_url)
            .or_else(|| non_empty(&self.dash_url))
            .or_else(|| non_empty(&self.video_url))
    }

    pub fn genres_display(&self) -> String {
        self.genres.join(", ")
    }

    /// Whether the record can be resolved against the source APIs.
    pub fn is_from_api(&self) -> bool {
        non_empty(&self.external_id).is_some()
    }

    /// Replace the streaming payload with freshly resolved sources.
    pub fn apply_resolution(&mut self, sources: Vec<VideoSource>, subtitles: Vec<SubtitleTrack>) {
        self.video_sources = sources;
        self.subtitles = subtitles;
        self.from_resolver = true;
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Year from a `YYYY-MM-DD` date; 0 when absent or malformed.
pub fn parse_year(date: &str) -> i32 {
    date.get(..4)
        .filter(|y| y.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|y| y.parse().ok())
        .unwrap_or(0)
}
