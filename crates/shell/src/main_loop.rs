//! The main-thread side of the shell.
//!
//! Workers post boxed jobs through a [`MainHandle`]; the thread that owns the
//! [`MainLoop`] runs them in arrival order.

use std::sync::mpsc;
use std::time::Duration;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Cloneable sender used by workers.
#[derive(Clone)]
pub struct MainHandle {
    tx: mpsc::Sender<Job>,
}

impl MainHandle {
    /// Queue `job` on the main loop. Returns `false` once the loop is gone.
    pub fn post(&self, job: impl FnOnce() + Send + 'static) -> bool {
        self.tx.send(Box::new(job)).is_ok()
    }
}

/// Owned by the UI thread.
pub struct MainLoop {
    rx: mpsc::Receiver<Job>,
}

impl MainLoop {
    /// Block until one job has run. `false` when every handle is dropped.
    pub fn run_next(&mut self) -> bool {
        match self.rx.recv() {
            Ok(job) => {
                job();
                true
            }
            Err(_) => false,
        }
    }

    /// Like [`run_next`](Self::run_next), giving up after `timeout`.
    pub fn run_next_timeout(&mut self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(job) => {
                job();
                true
            }
            Err(_) => false,
        }
    }

    /// Run every job already queued without blocking; returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            ran += 1;
        }
        ran
    }
}

pub fn main_loop() -> (MainHandle, MainLoop) {
    let (tx, rx) = mpsc::channel();
    (MainHandle { tx }, MainLoop { rx })
}
