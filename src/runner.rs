//! Background execution of requests on a bounded worker pool

use crate::config::RunnerConfig;
use crate::error::{BurlError, Result};
use crate::http::Request;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll};
use tokio::runtime::{Handle, Runtime};
use tokio::sync::{oneshot, Semaphore};

/// Pool that runs whole request lifecycles off the calling thread.
///
/// Cloning is cheap; clones share the pool.
#[derive(Clone)]
pub struct Runner {
    inner: Arc<RunnerInner>,
}

struct RunnerInner {
    runtime: Option<Runtime>,
    handle: Handle,
    permits: Arc<Semaphore>,
    workers: usize,
}

impl Drop for RunnerInner {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl Runner {
    /// Start a pool on a runtime owned by the runner
    pub fn new(config: RunnerConfig) -> Result<Self> {
        let workers = config.workers.max(1);
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(workers)
            .thread_name(config.thread_name)
            .enable_all()
            .build()
            .map_err(|e| BurlError::Config(format!("Cannot start worker pool: {}", e)))?;
        let handle = runtime.handle().clone();
        Ok(Self::build(Some(runtime), handle, workers))
    }

    /// Run on an existing tokio runtime, at most `workers` requests at once
    pub fn with_handle(handle: Handle, workers: usize) -> Self {
        Self::build(None, handle, workers.max(1))
    }

    fn build(runtime: Option<Runtime>, handle: Handle, workers: usize) -> Self {
        Self {
            inner: Arc::new(RunnerInner {
                runtime,
                handle,
                permits: Arc::new(Semaphore::new(workers)),
                workers,
            }),
        }
    }

    pub fn workers(&self) -> usize {
        self.inner.workers
    }

    /// Queue `request` for execution and return a handle to its outcome
    pub fn submit(&self, request: Request) -> Pending {
        let (sender, receiver) = oneshot::channel();
        let permits = self.inner.permits.clone();
        // The pool must outlive the task even if the request held the last handle.
        let pool = self.clone();

        self.inner.handle.spawn(async move {
            let outcome = match permits.acquire_owned().await {
                Ok(permit) => {
                    let joined = tokio::task::spawn_blocking(move || {
                        let _permit = permit;
                        request.execute()
                    })
                    .await;
                    joined.unwrap_or_else(|e| Err(BurlError::WorkerLost(e.to_string())))
                }
                Err(_) => Err(BurlError::WorkerLost("worker pool closed".to_string())),
            };
            if sender.send(outcome).is_err() {
                log::debug!("Request finished after its handle was dropped");
            }
            drop(pool);
        });

        Pending { receiver }
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("workers", &self.inner.workers)
            .field("owns_runtime", &self.inner.runtime.is_some())
            .finish()
    }
}

/// Process-wide pool used by requests that do not configure one
pub fn default_runner() -> Result<Runner> {
    static DEFAULT: OnceLock<std::result::Result<Runner, String>> = OnceLock::new();
    DEFAULT
        .get_or_init(|| Runner::new(RunnerConfig::default()).map_err(|e| e.to_string()))
        .clone()
        .map_err(BurlError::Config)
}

/// Outcome of a submitted request, resolved exactly once.
///
/// Await it from async code or call [`Pending::wait`] from a plain thread.
#[derive(Debug)]
pub struct Pending {
    receiver: oneshot::Receiver<Result<Request>>,
}

impl Pending {
    /// Already-resolved handle, used when submission itself failed
    pub(crate) fn failed(err: BurlError) -> Self {
        let (sender, receiver) = oneshot::channel();
        // The receiver is alive, so the send cannot fail.
        let _ = sender.send(Err(err));
        Pending { receiver }
    }

    /// Block the current thread until the request settles.
    ///
    /// Must not be called from within an async context; await instead.
    pub fn wait(self) -> Result<Request> {
        self.receiver
            .blocking_recv()
            .unwrap_or_else(|_| Err(BurlError::WorkerLost("result channel closed".to_string())))
    }
}

impl Future for Pending {
    type Output = Result<Request>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(|received| {
            received.unwrap_or_else(|_| {
                Err(BurlError::WorkerLost("result channel closed".to_string()))
            })
        })
    }
}

impl Request {
    /// Execute on this request's runner, or the process-wide one
    pub fn execute_async(self) -> Pending {
        let runner = match self.runner.clone() {
            Some(runner) => runner,
            None => match default_runner() {
                Ok(runner) => runner,
                Err(err) => return Pending::failed(err),
            },
        };
        runner.submit(self)
    }
}
