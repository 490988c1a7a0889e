//! Streaming-source resolution.
//!
//! A title is resolved by walking the provider registry in a fixed order:
//! fetch the encrypted blob, have it decrypted remotely, decode the payload.
//! The first provider that yields a playable source wins.

pub mod payload;
pub mod providers;
pub mod resolver;
pub mod upstream;

pub use payload::{DecodeReport, DecodedPayload};
pub use providers::{Mirror, Provider, Server};
pub use resolver::{Resolution, SourceQuery, SourceResolver};
pub use upstream::{SourceConfig, SourceUpstream, VideasyUpstream};

use cinestream_core::{ClientError, MediaKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("upstream returned {0}")]
    Status(u16),
    #[error("upstream returned an empty body")]
    EmptyBody,
    #[error("decryption response has no result")]
    MissingResult,
    #[error("invalid payload: {0}")]
    Payload(String),
    #[error("provider returned no playable sources")]
    NoSources,
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("{provider} does not serve {kind}")]
    Unsupported { provider: String, kind: MediaKind },
    #[error("record has no catalog id")]
    MissingId,
    #[error("failed to fetch data from all available servers")]
    Exhausted { attempted: usize },
}

impl From<ResolveError> for ClientError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::Transport(msg) => ClientError::Network(msg),
            ResolveError::UnknownProvider(id) => {
                ClientError::BadRequest(format!("unknown provider: {id}"))
            }
            e @ (ResolveError::Unsupported { .. } | ResolveError::MissingId) => {
                ClientError::BadRequest(e.to_string())
            }
            other => ClientError::Unavailable(other.to_string()),
        }
    }
}
