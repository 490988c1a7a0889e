//! Decoding of decrypted provider payloads.
//!
//! Shape: `{"sources": [{"quality", "url"}], "subtitles": [{"url", "lang",
//! "language"}]}`, both arrays optional. Elements are decoded one by one so a
//! bad element costs only itself.

use cinestream_core::{SubtitleTrack, VideoSource};
use serde::Deserialize;

use crate::ResolveError;

const UNKNOWN: &str = "Unknown";

#[derive(Deserialize)]
struct RawPayload {
    #[serde(default)]
    sources: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    subtitles: Option<Vec<serde_json::Value>>,
}

#[derive(Deserialize)]
struct RawSource {
    #[serde(default)]
    quality: Option<String>,
    url: String,
}

#[derive(Deserialize)]
struct RawSubtitle {
    url: String,
    #[serde(default)]
    lang: Option<String>,
    #[serde(default)]
    language: Option<String>,
}

/// Elements dropped while decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeReport {
    pub skipped_sources: usize,
    pub skipped_subtitles: usize,
}

impl DecodeReport {
    pub fn is_clean(&self) -> bool {
        self.skipped_sources == 0 && self.skipped_subtitles == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedPayload {
    pub sources: Vec<VideoSource>,
    pub subtitles: Vec<SubtitleTrack>,
    pub report: DecodeReport,
}

/// Decode a decrypted payload. Fails only when the text is not a JSON object.
pub fn decode(text: &str) -> Result<DecodedPayload, ResolveError> {
    let raw: RawPayload =
        serde_json::from_str(text).map_err(|e| ResolveError::Payload(e.to_string()))?;

    let mut out = DecodedPayload::default();

    for value in raw.sources.unwrap_or_default() {
        match serde_json::from_value::<RawSource>(value) {
            Ok(s) if !s.url.is_empty() => out.sources.push(VideoSource::new(
                s.quality.filter(|q| !q.is_empty()).unwrap_or_else(|| UNKNOWN.into()),
                s.url,
            )),
            _ => out.report.skipped_sources += 1,
        }
    }

    for value in raw.subtitles.unwrap_or_default() {
        match serde_json::from_value::<RawSubtitle>(value) {
            Ok(s) if !s.url.is_empty() => {
                let lang = s.lang.unwrap_or_else(|| UNKNOWN.into());
                let language = s.language.unwrap_or_else(|| lang.clone());
                out.subtitles.push(SubtitleTrack::new(s.url, lang, language));
            }
            _ => out.report.skipped_subtitles += 1,
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_sources_and_subtitles() {
        let text = r#"{
            "sources": [
                {"quality": "1080p", "url": "http://x/1080.m3u8"},
                {"quality": "720p", "url": "http://x/720.m3u8"}
            ],
            "subtitles": [
                {"url": "http://x/en.vtt", "lang": "en", "language": "English"}
            ]
        }"#;

        let decoded = decode(text).unwrap();
        assert_eq!(decoded.sources.len(), 2);
        assert_eq!(decoded.sources[0], VideoSource::new("1080p", "http://x/1080.m3u8"));
        assert_eq!(
            decoded.subtitles,
            vec![SubtitleTrack::new("http://x/en.vtt", "en", "English")]
        );
        assert!(decoded.report.is_clean());
    }

    #[test]
    fn empty_urls_and_bad_elements_are_counted() {
        let text = r#"{
            "sources": [
                {"quality": "1080p", "url": ""},
                {"quality": "720p"},
                42,
                {"url": "http://x/auto.m3u8"}
            ],
            "subtitles": [
                {"url": "", "lang": "en"},
                {"url": "http://x/fr.srt", "lang": "fr"}
            ]
        }"#;

        let decoded = decode(text).unwrap();
        assert_eq!(decoded.sources, vec![VideoSource::new("Unknown", "http://x/auto.m3u8")]);
        assert_eq!(decoded.subtitles[0].language, "fr");
        assert_eq!(
            decoded.report,
            DecodeReport {
                skipped_sources: 3,
                skipped_subtitles: 1
            }
        );
    }

    #[test]
    fn missing_arrays_decode_to_empty() {
        let decoded = decode(r#"{"sources": null}"#).unwrap();
        assert!(decoded.sources.is_empty());
        assert!(decoded.subtitles.is_empty());
    }

    #[test]
    fn non_object_is_an_error() {
        assert!(matches!(decode("not json"), Err(ResolveError::Payload(_))));
        assert!(decode("[1, 2]").is_err());
    }
}
