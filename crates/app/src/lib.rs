//! Composition root: configuration, tracing and the callback facade UI code
//! talks to.

pub mod config;
pub mod service;
pub mod telemetry;

pub use config::{AppConfig, ConfigError};
pub use service::CineStream;
