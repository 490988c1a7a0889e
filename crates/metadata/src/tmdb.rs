//! TMDB (The Movie Database) catalog client.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs
//!
//! Authenticates with a v4 read-access token sent as a bearer header.

use std::time::Duration;

use cinestream_core::{MediaKind, MediaRecord, parse_year};
use tracing::{debug, warn};

use crate::genres::genre_names;
use crate::provider::CatalogProvider;
use crate::query::CatalogQuery;
use crate::{EpisodeInfo, MetadataError, SeasonInfo};

const BASE_URL: &str = "https://api.themoviedb.org/3";
const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

const POSTER_SIZE: &str = "w500";
const BACKDROP_SIZE: &str = "w1280";
const ORIGINAL_SIZE: &str = "original";

/// Upper bound on records mapped from one list response.
pub const MAX_LIST_ITEMS: usize = 20;

const NO_DESCRIPTION: &str = "No description available";

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub bearer_token: String,
    pub language: String,
    /// Applied to both connect and full request.
    pub timeout: Duration,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            image_base_url: IMAGE_BASE.to_string(),
            bearer_token: String::new(),
            language: "en-US".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

pub struct TmdbClient {
    config: TmdbConfig,
    client: reqwest::Client,
}

/// Result of mapping a `results` array.
#[derive(Debug, Clone, Default)]
pub struct ParsedList {
    pub records: Vec<MediaRecord>,
    pub skipped: usize,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> Result<Self, MetadataError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value, MetadataError> {
        let url = format!("{}{path}", self.config.base_url.trim_end_matches('/'));
        debug!(url = %url, "TMDB request");

        let mut req = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("language", self.config.language.as_str())])
            .query(params);
        if !self.config.bearer_token.is_empty() {
            req = req.bearer_auth(&self.config.bearer_token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MetadataError::NotFound);
        }

        if !resp.status().is_success() {
            return Err(MetadataError::Provider(format!(
                "TMDB returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| MetadataError::Provider(format!("parse JSON: {e}")))
    }

    /// One list page. Failures are logged and yield an empty list.
    pub async fn fetch_list(
        &self,
        path: &str,
        params: &[(&str, String)],
        kind: Option<MediaKind>,
    ) -> Vec<MediaRecord> {
        let data = match self.get_json(path, params).await {
            Ok(data) => data,
            Err(e) => {
                warn!(path, error = %e, "catalog list request failed");
                return Vec::new();
            }
        };

        match parse_results(&data, kind, &self.config.image_base_url) {
            Ok(parsed) => {
                if parsed.skipped > 0 {
                    debug!(path, skipped = parsed.skipped, "skipped malformed list elements");
                }
                parsed.records
            }
            Err(e) => {
                warn!(path, error = %e, "catalog list response malformed");
                Vec::new()
            }
        }
    }

    /// Full metadata for one title. Failures are logged and yield `None`.
    pub async fn fetch_detail(&self, kind: MediaKind, id: &str) -> Option<MediaRecord> {
        let path = format!("/{kind}/{id}");
        let result = self
            .get_json(&path, &[])
            .await
            .and_then(|data| parse_detail(&data, kind, &self.config.image_base_url));

        match result {
            Ok(record) => Some(record),
            Err(MetadataError::NotFound) => {
                debug!(path = %path, "catalog entry not found");
                None
            }
            Err(e) => {
                warn!(path = %path, error = %e, "catalog detail request failed");
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbClient {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn list(&self, query: &CatalogQuery) -> Vec<MediaRecord> {
        self.fetch_list(&query.path(), &query.params(), query.kind())
            .await
    }

    async fn detail(&self, kind: MediaKind, id: &str) -> Option<MediaRecord> {
        self.fetch_detail(kind, id).await
    }

    async fn seasons(&self, series_id: &str) -> Vec<SeasonInfo> {
        match self.get_json(&format!("/tv/{series_id}"), &[]).await {
            Ok(data) => parse_seasons(&data, &self.config.image_base_url),
            Err(e) => {
                warn!(series_id, error = %e, "series seasons request failed");
                Vec::new()
            }
        }
    }

    async fn season_episodes(&self, series_id: &str, season: i32) -> Vec<EpisodeInfo> {
        let path = format!("/tv/{series_id}/season/{season}");
        match self.get_json(&path, &[]).await {
            Ok(data) => parse_episodes(&data, season, &self.config.image_base_url),
            Err(e) => {
                warn!(path = %path, error = %e, "season episodes request failed");
                Vec::new()
            }
        }
    }

    /// The episode as a playable record carrying the series' title and year.
    async fn episode(&self, series_id: &str, season: i32, episode: i32) -> Option<MediaRecord> {
        let path = format!("/tv/{series_id}/season/{season}/episode/{episode}");
        let (series, data) = tokio::join!(
            self.fetch_detail(MediaKind::Series, series_id),
            self.get_json(&path, &[]),
        );

        let data = match data {
            Ok(data) => data,
            Err(e) => {
                warn!(path = %path, error = %e, "episode request failed");
                return None;
            }
        };
        let Some(series) = series else {
            warn!(series_id, "series detail unavailable, dropping episode");
            return None;
        };

        Some(parse_episode_record(
            &data,
            &series,
            season,
            episode,
            &self.config.image_base_url,
        ))
    }
}

fn image(base: &str, size: &str, path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{}/{size}{p}", base.trim_end_matches('/')))
}

/// Map a list envelope. A missing `results` array fails the whole call;
/// malformed elements are skipped and counted.
pub fn parse_results(
    data: &serde_json::Value,
    kind: Option<MediaKind>,
    image_base: &str,
) -> Result<ParsedList, MetadataError> {
    let results = data["results"]
        .as_array()
        .ok_or_else(|| MetadataError::Malformed("missing results array".into()))?;

    let mut parsed = ParsedList::default();
    for item in results {
        if parsed.records.len() == MAX_LIST_ITEMS {
            break;
        }
        match parse_list_item(item, kind, image_base) {
            Ok(record) => parsed.records.push(record),
            Err(e) => {
                debug!(error = %e, "skipping list element");
                parsed.skipped += 1;
            }
        }
    }
    Ok(parsed)
}

/// Map one list element. `kind = None` reads the element's `media_type`.
pub fn parse_list_item(
    item: &serde_json::Value,
    kind: Option<MediaKind>,
    image_base: &str,
) -> Result<MediaRecord, MetadataError> {
    let kind = match kind {
        Some(k) => k,
        None => item["media_type"]
            .as_str()
            .and_then(MediaKind::from_wire)
            .ok_or_else(|| MetadataError::Malformed("unsupported media_type".into()))?,
    };

    let id = item["id"]
        .as_u64()
        .ok_or_else(|| MetadataError::Malformed("missing id".into()))?;

    let (title_key, date_key) = match kind {
        MediaKind::Movie => ("title", "release_date"),
        MediaKind::Series => ("name", "first_air_date"),
    };
    let title = item[title_key]
        .as_str()
        .ok_or_else(|| MetadataError::Malformed(format!("{id}: missing {title_key}")))?;

    let mut record = MediaRecord::new(id.to_string(), kind);
    record.external_id = Some(id.to_string());
    record.title = title.to_string();
    record.synopsis = item["overview"]
        .as_str()
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_DESCRIPTION)
        .to_string();
    record.release_year = parse_year(item[date_key].as_str().unwrap_or(""));
    record.rating = item["vote_average"].as_f64().unwrap_or(0.0) as f32;
    record.vote_count = item["vote_count"].as_u64().unwrap_or(0) as u32;

    if let Some(ids) = item["genre_ids"].as_array() {
        record.genres = genre_names(ids);
    }

    let poster = item["poster_path"].as_str();
    let backdrop = item["backdrop_path"].as_str().filter(|p| !p.is_empty());

    record.poster_url = image(image_base, POSTER_SIZE, poster);
    record.card_url = record.poster_url.clone();
    if backdrop.is_some() {
        record.backdrop_url = image(image_base, BACKDROP_SIZE, backdrop);
        record.hero_url = image(image_base, ORIGINAL_SIZE, backdrop);
    } else {
        // No backdrop: stretch the poster.
        record.backdrop_url = image(image_base, ORIGINAL_SIZE, poster);
        record.hero_url = record.backdrop_url.clone();
    }

    record.from_catalog = true;
    Ok(record)
}

/// Map a detail object: list fields plus runtime, status, tagline and named
/// genres.
pub fn parse_detail(
    data: &serde_json::Value,
    kind: MediaKind,
    image_base: &str,
) -> Result<MediaRecord, MetadataError> {
    let mut record = parse_list_item(data, Some(kind), image_base)?;

    record.runtime = match kind {
        MediaKind::Movie => data["runtime"]
            .as_i64()
            .filter(|r| *r > 0)
            .map(|r| format!("{r} min")),
        MediaKind::Series => data["number_of_seasons"]
            .as_i64()
            .filter(|n| *n > 0)
            .map(|n| format!("{n} Season{}", if n > 1 { "s" } else { "" })),
    };
    record.status = non_empty_str(&data["status"]);
    record.tagline = non_empty_str(&data["tagline"]);

    if let Some(genres) = data["genres"].as_array() {
        let names: Vec<String> = genres
            .iter()
            .filter_map(|g| g["name"].as_str().map(|s| s.to_string()))
            .collect();
        if !names.is_empty() {
            record.genres = names;
        }
    }

    Ok(record)
}

fn non_empty_str(v: &serde_json::Value) -> Option<String> {
    v.as_str().filter(|s| !s.is_empty()).map(|s| s.to_string())
}

fn parse_seasons(data: &serde_json::Value, image_base: &str) -> Vec<SeasonInfo> {
    let seasons = data["seasons"].as_array().cloned().unwrap_or_default();

    seasons
        .iter()
        .filter_map(|s| {
            let number = s["season_number"].as_i64().unwrap_or(0) as i32;
            // Season 0 holds specials.
            if number == 0 {
                return None;
            }
            Some(SeasonInfo {
                id: s["id"].as_u64().unwrap_or(0),
                season_number: number,
                name: s["name"]
                    .as_str()
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| format!("Season {number}")),
                overview: s["overview"].as_str().unwrap_or("").to_string(),
                episode_count: s["episode_count"].as_i64().unwrap_or(0) as i32,
                air_date: non_empty_str(&s["air_date"]),
                poster_url: image(image_base, POSTER_SIZE, s["poster_path"].as_str()),
            })
        })
        .collect()
}

fn parse_episodes(data: &serde_json::Value, season: i32, image_base: &str) -> Vec<EpisodeInfo> {
    let episodes = data["episodes"].as_array().cloned().unwrap_or_default();

    episodes
        .iter()
        .enumerate()
        .map(|(i, ep)| {
            let fallback_number = i as i32 + 1;
            EpisodeInfo {
                id: ep["id"].as_u64().unwrap_or(0),
                season_number: season,
                episode_number: ep["episode_number"]
                    .as_i64()
                    .map(|n| n as i32)
                    .unwrap_or(fallback_number),
                name: ep["name"]
                    .as_str()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| format!("Episode {fallback_number}")),
                overview: ep["overview"].as_str().unwrap_or(NO_DESCRIPTION).to_string(),
                air_date: non_empty_str(&ep["air_date"]),
                vote_average: ep["vote_average"].as_f64().unwrap_or(0.0),
                runtime_minutes: ep["runtime"].as_i64().map(|r| r as i32),
                still_url: image(image_base, BACKDROP_SIZE, ep["still_path"].as_str()),
            }
        })
        .collect()
}

/// Episode fields layered over the parent series record. Identity and title
/// stay the series'; the episode name goes to `episode_title`.
pub fn parse_episode_record(
    data: &serde_json::Value,
    series: &MediaRecord,
    season: i32,
    episode: i32,
    image_base: &str,
) -> MediaRecord {
    let id = data["id"].as_u64().unwrap_or(0).to_string();
    let mut record = MediaRecord::new(id, MediaKind::Series);
    record.external_id = series
        .external_id
        .clone()
        .or_else(|| Some(series.id.clone()));
    record.title = series.title.clone();
    record.release_year = series.release_year;
    record.genres = series.genres.clone();
    record.episode_title = non_empty_str(&data["name"]);
    record.synopsis = data["overview"]
        .as_str()
        .filter(|s| !s.is_empty())
        .unwrap_or(series.synopsis.as_str())
        .to_string();
    record.rating = data["vote_average"].as_f64().unwrap_or(0.0) as f32;
    record.runtime = data["runtime"]
        .as_i64()
        .filter(|r| *r > 0)
        .map(|r| format!("{r} min"));
    record.season = Some(season.to_string());
    record.episode = Some(episode.to_string());
    record.poster_url = image(image_base, BACKDROP_SIZE, data["still_path"].as_str())
        .or_else(|| series.poster_url.clone());
    record.backdrop_url = series.backdrop_url.clone();
    record.hero_url = series.hero_url.clone();
    record.from_catalog = true;
    record
}
