use std::sync::Arc;

use cinestream_core::{ContentType, MediaKind, MediaRecord};
use tracing::debug;

use crate::cache::{CacheStats, MetadataCache};
use crate::provider::CatalogProvider;
use crate::query::CatalogQuery;
use crate::{EpisodeInfo, SeasonInfo};

/// Suggestions shown before the user has typed anything.
pub const TRENDING_SEARCHES: &[&str] = &[
    "Avengers",
    "Star Wars",
    "Spider-Man",
    "Marvel",
    "DC",
    "Stranger Things",
    "Breaking Bad",
    "The Crown",
    "James Bond",
    "Fast & Furious",
];

/// Catalog access with list and detail caching.
pub struct CatalogRepository {
    provider: Arc<dyn CatalogProvider>,
    cache: MetadataCache,
}

impl CatalogRepository {
    pub fn new(provider: Arc<dyn CatalogProvider>, cache: MetadataCache) -> Self {
        Self { provider, cache }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn list(&self, query: &CatalogQuery) -> Vec<MediaRecord> {
        match query.cache_key() {
            Some(key) => {
                self.cache
                    .get_or_load(&key, || self.provider.list(query))
                    .await
            }
            None => self.provider.list(query).await,
        }
    }

    /// Always fetched fresh.
    pub async fn search(&self, content: ContentType, text: &str, page: u32) -> Vec<MediaRecord> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        let query = CatalogQuery::Search {
            content,
            query: text.to_string(),
            page,
        };
        self.provider.list(&query).await
    }

    /// Full record for a title. Only found records are cached.
    pub async fn details(&self, kind: MediaKind, id: &str) -> Option<MediaRecord> {
        let key = detail_key(kind, id);
        if let Some(mut hit) = self.cache.lookup(&key) {
            debug!(key = %key, "detail cache hit");
            if let Some(record) = hit.pop() {
                return Some(record);
            }
        }

        let record = self.provider.detail(kind, id).await?;
        self.cache.insert(key, vec![record.clone()]);
        Some(record)
    }

    pub async fn seasons(&self, series_id: &str) -> Vec<SeasonInfo> {
        self.provider.seasons(series_id).await
    }

    pub async fn season_episodes(&self, series_id: &str, season: i32) -> Vec<EpisodeInfo> {
        self.provider.season_episodes(series_id, season).await
    }

    pub async fn episode(&self, series_id: &str, season: i32, episode: i32) -> Option<MediaRecord> {
        self.provider.episode(series_id, season, episode).await
    }

    pub fn trending_searches(&self) -> Vec<String> {
        TRENDING_SEARCHES.iter().map(|s| s.to_string()).collect()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

fn detail_key(kind: MediaKind, id: &str) -> String {
    match kind {
        MediaKind::Movie => format!("movie_details_{id}"),
        MediaKind::Series => format!("tv_details_{id}"),
    }
}
