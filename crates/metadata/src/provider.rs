use cinestream_core::{MediaKind, MediaRecord};

use crate::query::CatalogQuery;
use crate::{EpisodeInfo, SeasonInfo};

/// A metadata catalog the repository can browse.
///
/// Implementations never fail towards the caller: transport, status and
/// parse errors are logged and surface as an empty list or `None`.
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch one page of a list, at most 20 records.
    async fn list(&self, query: &CatalogQuery) -> Vec<MediaRecord>;

    /// Full metadata for a movie or series.
    async fn detail(&self, kind: MediaKind, id: &str) -> Option<MediaRecord>;

    /// Seasons of a series, specials excluded.
    async fn seasons(&self, series_id: &str) -> Vec<SeasonInfo>;

    async fn season_episodes(&self, series_id: &str, season: i32) -> Vec<EpisodeInfo>;

    /// A single episode shaped as a playable record.
    async fn episode(&self, series_id: &str, season: i32, episode: i32) -> Option<MediaRecord>;
}
