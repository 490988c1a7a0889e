use std::sync::Arc;

use cinestream_core::{MediaKind, MediaRecord, SubtitleTrack, VideoSource};
use tracing::{debug, error, info, warn};

use crate::ResolveError;
use crate::payload::{self, DecodeReport};
use crate::providers::{self, Mirror, Provider};
use crate::upstream::SourceUpstream;

/// What the source API needs to identify a title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceQuery {
    pub title: String,
    pub kind: MediaKind,
    /// 0 when unknown.
    pub year: i32,
    pub tmdb_id: String,
    pub season: Option<String>,
    pub episode: Option<String>,
}

impl SourceQuery {
    pub fn movie(title: impl Into<String>, year: i32, tmdb_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: MediaKind::Movie,
            year,
            tmdb_id: tmdb_id.into(),
            season: None,
            episode: None,
        }
    }

    pub fn episode(
        title: impl Into<String>,
        year: i32,
        tmdb_id: impl Into<String>,
        season: i32,
        episode: i32,
    ) -> Self {
        Self {
            title: title.into(),
            kind: MediaKind::Series,
            year,
            tmdb_id: tmdb_id.into(),
            season: Some(season.to_string()),
            episode: Some(episode.to_string()),
        }
    }

    /// Build a query from a catalog record. The record must carry its
    /// catalog id.
    pub fn from_record(record: &MediaRecord) -> Result<Self, ResolveError> {
        let tmdb_id = record
            .external_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(ResolveError::MissingId)?;

        Ok(Self {
            title: record.title.clone(),
            kind: record.kind,
            year: record.release_year,
            tmdb_id: tmdb_id.to_string(),
            season: record.season.clone(),
            episode: record.episode.clone(),
        })
    }
}

/// Sources from the provider that answered.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub provider: Provider,
    pub mirror: Mirror,
    pub sources: Vec<VideoSource>,
    pub subtitles: Vec<SubtitleTrack>,
    pub report: DecodeReport,
}

impl Resolution {
    pub fn apply_to(self, record: &mut MediaRecord) {
        record.apply_resolution(self.sources, self.subtitles);
    }
}

pub struct SourceResolver {
    upstream: Arc<dyn SourceUpstream>,
    providers: Vec<Provider>,
}

impl SourceResolver {
    /// Resolver over the registry's fallback order.
    pub fn new(upstream: Arc<dyn SourceUpstream>) -> Self {
        Self::with_providers(upstream, providers::fallback_order().copied().collect())
    }

    pub fn with_providers(upstream: Arc<dyn SourceUpstream>, providers: Vec<Provider>) -> Self {
        Self {
            upstream,
            providers,
        }
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Try each provider in order on its primary mirror and return the first
    /// one that yields a playable source.
    pub async fn resolve(&self, query: &SourceQuery) -> Result<Resolution, ResolveError> {
        for provider in &self.providers {
            debug!(provider = provider.id, title = %query.title, "trying provider");
            match self.attempt(provider, Mirror::Primary, query).await {
                Ok(resolution) => {
                    info!(
                        provider = provider.id,
                        sources = resolution.sources.len(),
                        subtitles = resolution.subtitles.len(),
                        "resolved sources"
                    );
                    return Ok(resolution);
                }
                Err(e) => warn!(provider = provider.id, error = %e, "provider failed"),
            }
        }

        error!(title = %query.title, tmdb_id = %query.tmdb_id, "all providers failed");
        Err(ResolveError::Exhausted {
            attempted: self.providers.len(),
        })
    }

    /// One attempt against a server the user picked.
    pub async fn resolve_with(
        &self,
        provider_id: &str,
        mirror: Mirror,
        query: &SourceQuery,
    ) -> Result<Resolution, ResolveError> {
        let provider = providers::find(provider_id)
            .or_else(|| self.providers.iter().find(|p| p.id == provider_id))
            .ok_or_else(|| ResolveError::UnknownProvider(provider_id.to_string()))?;

        if !provider.serves(query.kind) {
            return Err(ResolveError::Unsupported {
                provider: provider.id.to_string(),
                kind: query.kind,
            });
        }

        self.attempt(provider, mirror, query).await
    }

    async fn attempt(
        &self,
        provider: &Provider,
        mirror: Mirror,
        query: &SourceQuery,
    ) -> Result<Resolution, ResolveError> {
        let encrypted = self
            .upstream
            .fetch_encrypted(provider, mirror, query)
            .await?;
        let decrypted = self.upstream.decrypt(&encrypted, &query.tmdb_id).await?;
        let decoded = payload::decode(&decrypted)?;

        if !decoded.report.is_clean() {
            debug!(provider = provider.id, report = ?decoded.report, "dropped payload elements");
        }
        if decoded.sources.is_empty() {
            return Err(ResolveError::NoSources);
        }

        Ok(Resolution {
            provider: *provider,
            mirror,
            sources: decoded.sources,
            subtitles: decoded.subtitles,
            report: decoded.report,
        })
    }
}
