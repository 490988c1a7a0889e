pub mod cache;
pub mod genres;
pub mod provider;
pub mod query;
pub mod repository;
pub mod tmdb;

use cinestream_core::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("provider error: {0}")]
    Provider(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed element: {0}")]
    Malformed(String),
    #[error("not found")]
    NotFound,
}

impl From<MetadataError> for ClientError {
    fn from(e: MetadataError) -> Self {
        match e {
            MetadataError::Network(msg) => ClientError::Network(msg),
            MetadataError::NotFound => ClientError::NotFound("catalog entry".into()),
            other => ClientError::Internal(other.to_string()),
        }
    }
}

/// A season as listed on a series detail page.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SeasonInfo {
    pub id: u64,
    pub season_number: i32,
    pub name: String,
    pub overview: String,
    pub episode_count: i32,
    pub air_date: Option<String>,
    pub poster_url: Option<String>,
}

/// Episode metadata from a season listing.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EpisodeInfo {
    pub id: u64,
    pub season_number: i32,
    pub episode_number: i32,
    pub name: String,
    pub overview: String,
    pub air_date: Option<String>,
    pub vote_average: f64,
    pub runtime_minutes: Option<i32>,
    pub still_url: Option<String>,
}
