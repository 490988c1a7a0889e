use std::sync::Arc;

use anyhow::Context;
use cinestream_core::{ClientError, ContentType, MediaKind, MediaRecord};
use cinestream_metadata::cache::{CacheStats, MetadataCache};
use cinestream_metadata::query::{CatalogQuery, HomeRow, home_rows};
use cinestream_metadata::repository::CatalogRepository;
use cinestream_metadata::tmdb::TmdbClient;
use cinestream_metadata::{EpisodeInfo, SeasonInfo};
use cinestream_resolver::providers::servers_for;
use cinestream_resolver::{Mirror, Server, SourceQuery, SourceResolver, VideasyUpstream};
use cinestream_shell::{MainHandle, TaskHandle, TaskScope, WorkerPool};
use tracing::{info, warn};

use crate::config::AppConfig;

/// Entry point for UI collaborators.
///
/// Every network operation runs on the worker pool and reports through exactly
/// one of its two callbacks on the main loop.
pub struct CineStream {
    catalog: Arc<CatalogRepository>,
    resolver: Arc<SourceResolver>,
    pool: WorkerPool,
}

impl CineStream {
    /// Wire every component from `config`. Install tracing first so startup
    /// warnings are not lost.
    pub fn new(config: &AppConfig, main: MainHandle) -> anyhow::Result<Self> {
        if !config.has_tmdb_token() {
            warn!("CINESTREAM_TMDB_TOKEN is not set, catalog requests will be rejected");
        }

        let tmdb =
            TmdbClient::new(config.tmdb.clone()).context("failed to build catalog client")?;
        let catalog =
            CatalogRepository::new(Arc::new(tmdb), MetadataCache::new(config.cache.clone()));

        let upstream = VideasyUpstream::new(config.sources.clone())
            .context("failed to build source client")?;
        let resolver = SourceResolver::new(Arc::new(upstream));

        let pool =
            WorkerPool::new(config.pool.clone(), main).context("failed to start worker pool")?;

        info!(
            catalog = catalog.provider_name(),
            providers = resolver.providers().len(),
            "cinestream ready"
        );
        Ok(Self::from_parts(catalog, resolver, pool))
    }

    pub fn from_parts(
        catalog: CatalogRepository,
        resolver: SourceResolver,
        pool: WorkerPool,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            resolver: Arc::new(resolver),
            pool,
        }
    }

    /// A cancellation scope for one screen.
    pub fn scope(&self) -> TaskScope {
        self.pool.scope()
    }

    pub fn list<S, E>(
        &self,
        scope: &TaskScope,
        query: CatalogQuery,
        on_success: S,
        on_error: E,
    ) -> TaskHandle
    where
        S: FnOnce(Vec<MediaRecord>) + Send + 'static,
        E: FnOnce(ClientError) + Send + 'static,
    {
        let catalog = self.catalog.clone();
        self.pool.submit(
            scope,
            async move { Ok(catalog.list(&query).await) },
            on_success,
            on_error,
        )
    }

    /// Reports `NotFound` when the catalog has no such title.
    pub fn details<S, E>(
        &self,
        scope: &TaskScope,
        kind: MediaKind,
        id: String,
        on_success: S,
        on_error: E,
    ) -> TaskHandle
    where
        S: FnOnce(MediaRecord) + Send + 'static,
        E: FnOnce(ClientError) + Send + 'static,
    {
        let catalog = self.catalog.clone();
        self.pool.submit(
            scope,
            async move {
                catalog
                    .details(kind, &id)
                    .await
                    .ok_or_else(|| ClientError::NotFound(format!("{kind} {id}")))
            },
            on_success,
            on_error,
        )
    }

    pub fn search<S, E>(
        &self,
        scope: &TaskScope,
        content: ContentType,
        text: String,
        page: u32,
        on_success: S,
        on_error: E,
    ) -> TaskHandle
    where
        S: FnOnce(Vec<MediaRecord>) + Send + 'static,
        E: FnOnce(ClientError) + Send + 'static,
    {
        let catalog = self.catalog.clone();
        self.pool.submit(
            scope,
            async move { Ok(catalog.search(content, &text, page).await) },
            on_success,
            on_error,
        )
    }

    pub fn seasons<S, E>(
        &self,
        scope: &TaskScope,
        series_id: String,
        on_success: S,
        on_error: E,
    ) -> TaskHandle
    where
        S: FnOnce(Vec<SeasonInfo>) + Send + 'static,
        E: FnOnce(ClientError) + Send + 'static,
    {
        let catalog = self.catalog.clone();
        self.pool.submit(
            scope,
            async move { Ok(catalog.seasons(&series_id).await) },
            on_success,
            on_error,
        )
    }

    pub fn season_episodes<S, E>(
        &self,
        scope: &TaskScope,
        series_id: String,
        season: i32,
        on_success: S,
        on_error: E,
    ) -> TaskHandle
    where
        S: FnOnce(Vec<EpisodeInfo>) + Send + 'static,
        E: FnOnce(ClientError) + Send + 'static,
    {
        let catalog = self.catalog.clone();
        self.pool.submit(
            scope,
            async move { Ok(catalog.season_episodes(&series_id, season).await) },
            on_success,
            on_error,
        )
    }

    /// One episode, titled with its series so it can go straight to
    /// [`resolve_sources`](Self::resolve_sources).
    pub fn episode<S, E>(
        &self,
        scope: &TaskScope,
        series_id: String,
        season: i32,
        episode: i32,
        on_success: S,
        on_error: E,
    ) -> TaskHandle
    where
        S: FnOnce(MediaRecord) + Send + 'static,
        E: FnOnce(ClientError) + Send + 'static,
    {
        let catalog = self.catalog.clone();
        self.pool.submit(
            scope,
            async move {
                catalog
                    .episode(&series_id, season, episode)
                    .await
                    .ok_or_else(|| {
                        ClientError::NotFound(format!("{series_id} S{season}E{episode}"))
                    })
            },
            on_success,
            on_error,
        )
    }

    /// Resolve playable sources for `record` and hand it back enriched.
    pub fn resolve_sources<S, E>(
        &self,
        scope: &TaskScope,
        mut record: MediaRecord,
        on_success: S,
        on_error: E,
    ) -> TaskHandle
    where
        S: FnOnce(MediaRecord) + Send + 'static,
        E: FnOnce(ClientError) + Send + 'static,
    {
        let resolver = self.resolver.clone();
        self.pool.submit(
            scope,
            async move {
                let query = SourceQuery::from_record(&record)?;
                resolver.resolve(&query).await?.apply_to(&mut record);
                Ok::<_, ClientError>(record)
            },
            on_success,
            on_error,
        )
    }

    /// Like [`resolve_sources`](Self::resolve_sources) against one server the
    /// user picked; no fallback.
    pub fn resolve_on_server<S, E>(
        &self,
        scope: &TaskScope,
        mut record: MediaRecord,
        provider_id: String,
        mirror: Mirror,
        on_success: S,
        on_error: E,
    ) -> TaskHandle
    where
        S: FnOnce(MediaRecord) + Send + 'static,
        E: FnOnce(ClientError) + Send + 'static,
    {
        let resolver = self.resolver.clone();
        self.pool.submit(
            scope,
            async move {
                let query = SourceQuery::from_record(&record)?;
                resolver
                    .resolve_with(&provider_id, mirror, &query)
                    .await?
                    .apply_to(&mut record);
                Ok::<_, ClientError>(record)
            },
            on_success,
            on_error,
        )
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.catalog.cache_stats()
    }

    pub fn clear_cache(&self) {
        self.catalog.clear_cache();
        info!("catalog cache cleared");
    }

    pub fn servers_for(&self, kind: MediaKind) -> Vec<Server> {
        servers_for(kind)
    }

    /// Browse rows for the movie or series screen; feed each query to
    /// [`list`](Self::list).
    pub fn home_rows(&self, kind: MediaKind) -> Vec<HomeRow> {
        home_rows(kind)
    }

    pub fn trending_searches(&self) -> Vec<String> {
        self.catalog.trending_searches()
    }

    /// Cancel outstanding work and stop the worker threads.
    pub fn shutdown(self) {
        self.pool.shutdown();
    }
}
