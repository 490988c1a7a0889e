//! Remote subtitle track helpers.
//!
//! Format is taken from the URL path extension, ignoring any query string:
//! - `https://cdn/x/en.vtt`        → WebVTT
//! - `https://cdn/x/en.srt?t=123`  → SubRip
//! - `https://cdn/x/en`            → unknown, not loadable by the player
//!
//! Supported extensions: .vtt, .srt, .ssa, .ass, .smi, .ttml, .xml

use serde::{Deserialize, Serialize};

use crate::types::SubtitleTrack;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubtitleFormat {
    Vtt,
    Srt,
    Ssa,
    Ass,
    Smi,
    Ttml, // also .xml
}

impl SubtitleFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "vtt" => Some(Self::Vtt),
            "srt" => Some(Self::Srt),
            "ssa" => Some(Self::Ssa),
            "ass" => Some(Self::Ass),
            "smi" => Some(Self::Smi),
            "ttml" | "xml" => Some(Self::Ttml),
            _ => None,
        }
    }

    pub fn from_url(url: &str) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let file = path.rsplit('/').next().unwrap_or(path);
        let (_, ext) = file.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Vtt => "text/vtt",
            Self::Srt => "application/x-subrip",
            Self::Ssa | Self::Ass => "text/x-ssa",
            Self::Smi => "application/smil+xml",
            Self::Ttml => "application/ttml+xml",
        }
    }
}

pub fn is_valid_subtitle_url(url: &str) -> bool {
    !url.is_empty() && SubtitleFormat::from_url(url).is_some()
}

impl SubtitleTrack {
    pub fn format(&self) -> Option<SubtitleFormat> {
        SubtitleFormat::from_url(&self.url)
    }

    /// Label for a track picker, e.g. "English (EN)".
    pub fn label(&self) -> String {
        let code = self.lang.trim();
        let name = self.language.trim();
        match (name.is_empty(), code.is_empty()) {
            (false, false) if !name.eq_ignore_ascii_case(code) => {
                format!("{name} ({})", code.to_uppercase())
            }
            (false, _) => name.to_string(),
            (true, false) => code.to_uppercase(),
            (true, true) => "Unknown".into(),
        }
    }
}

/// First track whose language code matches, case-insensitively.
pub fn find_by_language<'a>(tracks: &'a [SubtitleTrack], lang: &str) -> Option<&'a SubtitleTrack> {
    tracks.iter().find(|t| t.lang.eq_ignore_ascii_case(lang))
}
