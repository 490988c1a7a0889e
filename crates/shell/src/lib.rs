//! Async execution shell: a fixed worker pool for network-bound tasks and a
//! main-thread queue their callbacks are delivered on.

pub mod main_loop;
pub mod pool;

pub use main_loop::{MainHandle, MainLoop, main_loop};
pub use pool::{PoolConfig, TaskHandle, TaskScope, WorkerPool};

use cinestream_core::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("invalid pool config: {0}")]
    InvalidConfig(String),
    #[error("failed to start worker runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl From<ShellError> for ClientError {
    fn from(e: ShellError) -> Self {
        ClientError::Internal(e.to_string())
    }
}
