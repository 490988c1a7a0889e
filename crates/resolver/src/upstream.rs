//! HTTP access to the source API and the decryption service.

use std::time::Duration;

use cinestream_core::MediaKind;
use tracing::debug;

use crate::ResolveError;
use crate::providers::{Mirror, Provider};
use crate::resolver::SourceQuery;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// The two remote calls one provider attempt is made of.
#[async_trait::async_trait]
pub trait SourceUpstream: Send + Sync {
    /// Opaque encrypted blob for `query` from one provider.
    async fn fetch_encrypted(
        &self,
        provider: &Provider,
        mirror: Mirror,
        query: &SourceQuery,
    ) -> Result<String, ResolveError>;

    /// Decrypted payload text for a blob fetched for title `id`.
    async fn decrypt(&self, text: &str, id: &str) -> Result<String, ResolveError>;
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub base_url: String,
    pub backup_url: String,
    pub decrypt_url: String,
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.videasy.net".to_string(),
            backup_url: "https://api2.videasy.net".to_string(),
            decrypt_url: "https://enc-dec.app/api/dec-videasy".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

pub struct VideasyUpstream {
    config: SourceConfig,
    client: reqwest::Client,
}

impl VideasyUpstream {
    pub fn new(config: SourceConfig) -> Result<Self, ResolveError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ResolveError::Transport(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn mirror_base(&self, mirror: Mirror) -> &str {
        let base = match mirror {
            Mirror::Primary => &self.config.base_url,
            Mirror::Backup => &self.config.backup_url,
        };
        base.trim_end_matches('/')
    }
}

/// Query string for a `sources-with-title` request. Season and episode are
/// only sent for series when both are known.
pub fn source_params(query: &SourceQuery) -> Vec<(&'static str, String)> {
    let year = if query.year > 0 {
        query.year.to_string()
    } else {
        String::new()
    };

    let mut params = vec![
        ("title", query.title.clone()),
        ("mediaType", query.kind.as_str().to_string()),
        ("year", year),
        ("tmdbId", query.tmdb_id.clone()),
    ];

    if query.kind == MediaKind::Series {
        if let (Some(season), Some(episode)) = (&query.season, &query.episode) {
            params.push(("seasonId", season.clone()));
            params.push(("episodeId", episode.clone()));
        }
    }
    params
}

#[async_trait::async_trait]
impl SourceUpstream for VideasyUpstream {
    async fn fetch_encrypted(
        &self,
        provider: &Provider,
        mirror: Mirror,
        query: &SourceQuery,
    ) -> Result<String, ResolveError> {
        let url = format!("{}/{}/sources-with-title", self.mirror_base(mirror), provider.id);
        debug!(url = %url, provider = provider.id, "source request");

        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::CONNECTION, "keep-alive")
            .query(&source_params(query))
            .send()
            .await
            .map_err(|e| ResolveError::Transport(e.to_string()))?;

        if resp.status() != reqwest::StatusCode::OK {
            return Err(ResolveError::Status(resp.status().as_u16()));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ResolveError::Transport(e.to_string()))?;
        let body = body.trim();
        if body.is_empty() {
            return Err(ResolveError::EmptyBody);
        }
        Ok(body.to_string())
    }

    async fn decrypt(&self, text: &str, id: &str) -> Result<String, ResolveError> {
        let resp = self
            .client
            .post(&self.config.decrypt_url)
            .json(&serde_json::json!({ "text": text, "id": id }))
            .send()
            .await
            .map_err(|e| ResolveError::Transport(e.to_string()))?;

        if resp.status() != reqwest::StatusCode::OK {
            return Err(ResolveError::Status(resp.status().as_u16()));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ResolveError::Payload(format!("decryption response: {e}")))?;

        match body.get("result") {
            Some(serde_json::Value::String(s)) => Ok(s.clone()),
            // Some deployments return the payload already decoded.
            Some(v @ serde_json::Value::Object(_)) => Ok(v.to_string()),
            _ => Err(ResolveError::MissingResult),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(kind: MediaKind) -> SourceQuery {
        SourceQuery {
            title: "Stranger Things".into(),
            kind,
            year: 2016,
            tmdb_id: "66732".into(),
            season: Some("1".into()),
            episode: Some("3".into()),
        }
    }

    #[test]
    fn series_params_include_episode() {
        let params = source_params(&query(MediaKind::Series));
        assert!(params.contains(&("mediaType", "tv".to_string())));
        assert!(params.contains(&("seasonId", "1".to_string())));
        assert!(params.contains(&("episodeId", "3".to_string())));
    }

    #[test]
    fn movie_params_never_include_episode() {
        let params = source_params(&query(MediaKind::Movie));
        assert_eq!(params.len(), 4);
        assert!(params.contains(&("year", "2016".to_string())));
    }

    #[test]
    fn series_without_episode_omits_both() {
        let mut q = query(MediaKind::Series);
        q.episode = None;
        let params = source_params(&q);
        assert!(!params.iter().any(|(k, _)| *k == "seasonId"));
    }

    #[test]
    fn unknown_year_is_blank() {
        let mut q = query(MediaKind::Movie);
        q.year = 0;
        assert!(source_params(&q).contains(&("year", String::new())));
    }
}
