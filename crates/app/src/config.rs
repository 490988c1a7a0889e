use std::time::Duration;

use cinestream_metadata::cache::CacheConfig;
use cinestream_metadata::tmdb::TmdbConfig;
use cinestream_resolver::SourceConfig;
use cinestream_shell::PoolConfig;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: expected a positive integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub tmdb: TmdbConfig,
    pub sources: SourceConfig,
    pub cache: CacheConfig,
    pub pool: PoolConfig,
}

impl AppConfig {
    /// Read `CINESTREAM_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let string = |key: &str, target: &mut String| {
            if let Some(v) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *target = v.trim().to_string();
            }
        };

        string("CINESTREAM_TMDB_TOKEN", &mut config.tmdb.bearer_token);
        string("CINESTREAM_TMDB_BASE_URL", &mut config.tmdb.base_url);
        string("CINESTREAM_IMAGE_BASE_URL", &mut config.tmdb.image_base_url);
        string("CINESTREAM_LANGUAGE", &mut config.tmdb.language);
        string("CINESTREAM_SOURCE_BASE_URL", &mut config.sources.base_url);
        string("CINESTREAM_SOURCE_BACKUP_URL", &mut config.sources.backup_url);
        string("CINESTREAM_DECRYPT_URL", &mut config.sources.decrypt_url);

        if let Some(secs) = number(&lookup, "CINESTREAM_HTTP_TIMEOUT_SECS")? {
            let timeout = Duration::from_secs(secs);
            config.tmdb.timeout = timeout;
            config.sources.timeout = timeout;
        }
        if let Some(secs) = number(&lookup, "CINESTREAM_CACHE_TTL_SECS")? {
            config.cache.ttl = Duration::from_secs(secs);
        }
        if let Some(n) = number(&lookup, "CINESTREAM_CACHE_CAPACITY")? {
            config.cache.capacity = n as usize;
        }
        if let Some(n) = number(&lookup, "CINESTREAM_WORKERS")? {
            config.pool.workers = n as usize;
        }

        Ok(config)
    }

    pub fn has_tmdb_token(&self) -> bool {
        !self.tmdb.bearer_token.is_empty()
    }
}

fn number<F>(lookup: &F, key: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ConfigError::InvalidNumber { key, value: raw }),
    }
}
