//! Executors deciding where and how a scan runs.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use tracing::warn;
use xray_core::render::panic_message;

/// A scan waiting to run.
pub type ScanTask = Box<dyn FnOnce() -> Result<String> + Send>;

/// Prefix of the string returned by [`NeverThrowingExecutor`] on failure.
pub const SCAN_FAILURE_PREFIX: &str = "Exception when scanning: ";

/// Runs scans.
pub trait ScanExecutor {
    fn execute(&self, task: ScanTask) -> Result<String>;
}

/// Scan executor failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    Timeout { timeout_ms: u64 },
    WorkerPanicked(String),
    WorkerGone,
    Spawn(String),
}

impl std::fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout { timeout_ms } => {
                write!(f, "could not scan hierarchy, timed out after {timeout_ms}ms")
            }
            Self::WorkerPanicked(msg) => write!(f, "scan worker panicked: {msg}"),
            Self::WorkerGone => write!(f, "scan worker exited without a result"),
            Self::Spawn(msg) => write!(f, "failed to spawn scan worker: {msg}"),
        }
    }
}

impl std::error::Error for ExecutorError {}

/// Runs the scan on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughExecutor;

impl ScanExecutor for PassthroughExecutor {
    fn execute(&self, task: ScanTask) -> Result<String> {
        task()
    }
}

/// Turns any error or panic of the wrapped executor into an
/// `Exception when scanning: <message>` result.
#[derive(Debug, Clone, Default)]
pub struct NeverThrowingExecutor<E> {
    delegate: E,
}

impl<E: ScanExecutor> NeverThrowingExecutor<E> {
    pub fn new(delegate: E) -> Self {
        Self { delegate }
    }
}

impl<E: ScanExecutor> ScanExecutor for NeverThrowingExecutor<E> {
    fn execute(&self, task: ScanTask) -> Result<String> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.delegate.execute(task)));
        let message = match outcome {
            Ok(Ok(scan)) => return Ok(scan),
            Ok(Err(err)) => format!("{err:#}"),
            Err(payload) => panic_message(&*payload),
        };
        Ok(format!("{SCAN_FAILURE_PREFIX}{message}"))
    }
}

/// Runs the scan on a worker thread and waits at most `timeout` for it.
///
/// A scan that times out keeps running on its detached worker and its
/// result is discarded.
#[derive(Debug, Clone, Copy)]
pub struct ThreadExecutor {
    timeout: Duration,
}

impl ThreadExecutor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl ScanExecutor for ThreadExecutor {
    fn execute(&self, task: ScanTask) -> Result<String> {
        let (tx, rx) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("xray-scan".to_string())
            .spawn(move || {
                // The receiver is gone if we already timed out.
                let _ = tx.send(task());
            })
            .map_err(|err| ExecutorError::Spawn(err.to_string()))?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                let timeout_ms = self.timeout.as_millis() as u64;
                warn!(timeout_ms, "scan timed out, abandoning worker");
                Err(ExecutorError::Timeout { timeout_ms }.into())
            }
            Err(RecvTimeoutError::Disconnected) => match worker.join() {
                Err(payload) => Err(ExecutorError::WorkerPanicked(panic_message(&*payload)).into()),
                Ok(()) => Err(ExecutorError::WorkerGone.into()),
            },
        }
    }
}
