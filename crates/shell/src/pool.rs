use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use cinestream_core::ClientError;
use futures::FutureExt;
use tokio::runtime::{Handle, Runtime};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::ShellError;
use crate::main_loop::MainHandle;

#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Worker threads, and the number of tasks allowed in flight at once.
    pub workers: usize,
    /// How long `shutdown` waits for running tasks to unwind.
    pub shutdown_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

/// Cancellation tied to one screen. Dropping the scope cancels every task
/// submitted through it.
pub struct TaskScope {
    token: CancellationToken,
}

impl TaskScope {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Handle to one submitted task. Dropping it does not cancel the task.
#[derive(Clone)]
pub struct TaskHandle {
    token: CancellationToken,
}

impl TaskHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Fixed-size pool running network tasks off the main thread.
pub struct WorkerPool {
    runtime: Option<Runtime>,
    handle: Handle,
    semaphore: Arc<Semaphore>,
    root: CancellationToken,
    main: MainHandle,
    config: PoolConfig,
}

impl WorkerPool {
    pub fn new(config: PoolConfig, main: MainHandle) -> Result<Self, ShellError> {
        if config.workers == 0 {
            return Err(ShellError::InvalidConfig("workers must be at least 1".into()));
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(config.workers)
            .thread_name("cinestream-worker")
            .enable_all()
            .build()?;
        let handle = runtime.handle().clone();

        info!(workers = config.workers, "worker pool started");
        Ok(Self {
            runtime: Some(runtime),
            handle,
            semaphore: Arc::new(Semaphore::new(config.workers)),
            root: CancellationToken::new(),
            main,
            config,
        })
    }

    pub fn scope(&self) -> TaskScope {
        TaskScope {
            token: self.root.child_token(),
        }
    }

    /// Tasks currently holding a worker slot.
    pub fn active(&self) -> usize {
        self.config.workers - self.semaphore.available_permits()
    }

    /// Run `task` on the pool and deliver its outcome on the main loop.
    ///
    /// Exactly one of `on_success` / `on_error` runs, once, on the thread
    /// driving the [`MainLoop`](crate::MainLoop). If the task or its scope is
    /// cancelled before delivery, neither runs.
    pub fn submit<T, F, S, E>(
        &self,
        scope: &TaskScope,
        task: F,
        on_success: S,
        on_error: E,
    ) -> TaskHandle
    where
        T: Send + 'static,
        F: Future<Output = Result<T, ClientError>> + Send + 'static,
        S: FnOnce(T) + Send + 'static,
        E: FnOnce(ClientError) + Send + 'static,
    {
        let token = scope.token.child_token();
        let task_token = token.clone();
        let semaphore = self.semaphore.clone();
        let main = self.main.clone();

        self.handle.spawn(async move {
            let work = async move {
                // Closed on shutdown.
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return Err(ClientError::Cancelled);
                };
                match AssertUnwindSafe(task).catch_unwind().await {
                    Ok(result) => result,
                    Err(panic) => {
                        let msg = panic_message(&*panic);
                        warn!(panic = %msg, "task panicked");
                        Err(ClientError::Internal(msg))
                    }
                }
            };

            let result = tokio::select! {
                biased;
                _ = task_token.cancelled() => {
                    debug!("task cancelled before completion");
                    return;
                }
                result = work => result,
            };

            let delivered = main.post(move || {
                // The screen may have gone away while the job was queued.
                if task_token.is_cancelled() {
                    return;
                }
                match result {
                    Ok(value) => on_success(value),
                    Err(e) => on_error(e),
                }
            });
            if !delivered {
                debug!("main loop gone, dropping task result");
            }
        });

        TaskHandle { token }
    }

    /// Cancel outstanding tasks and stop the worker threads.
    pub fn shutdown(mut self) {
        self.root.cancel();
        self.semaphore.close();
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_timeout(self.config.shutdown_timeout);
        }
        info!("worker pool stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            warn!("worker pool dropped without shutdown");
            self.root.cancel();
            runtime.shutdown_background();
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}
