pub mod task;
mod worker;

use std::sync::Arc;
use std::thread;

use log::{debug, warn};

use crate::errors::{PoolError, Result};
use crate::metrics::MetricsCollector;
use crate::queue::SharedQueue;
use task::{BoxedTask, PanicPolicy};
use worker::{worker_loop, WorkerContext, WorkerHandle, WorkerStatus};

pub use worker::{WorkerSnapshot, WorkerState};

const DEFAULT_NUM_THREADS: usize = 4;
const DEFAULT_THREAD_NAME_PREFIX: &str = "pool-worker";

/// A fixed-size thread pool fed by a single shared FIFO queue.
///
/// Construction records the configuration; no thread exists until [`start`](Self::start).
/// Dropping the pool stops it and joins every worker, so no worker outlives the pool.
pub struct ThreadPool {
    num_threads: usize,
    queue: Arc<SharedQueue>,
    workers: Vec<WorkerHandle>,
    started: bool,
    thread_name_prefix: String,
    stack_size: Option<usize>,
    panic_policy: PanicPolicy,
    metrics_collector: Option<Arc<dyn MetricsCollector>>,
}

impl ThreadPool {
    /// Creates an unstarted pool with `num_threads` workers and default settings.
    ///
    /// A pool with zero threads accepts submissions but never runs them.
    pub fn new(num_threads: usize) -> Self {
        ThreadPoolBuilder::new().num_threads(num_threads).build()
    }

    /// Like [`new`](Self::new), but takes a signed count and rejects negative values.
    pub fn try_new(num_threads: i64) -> Result<Self> {
        let n = usize::try_from(num_threads)
            .map_err(|_| PoolError::InvalidThreadCount(num_threads))?;
        Ok(Self::new(n))
    }

    pub fn builder() -> ThreadPoolBuilder {
        ThreadPoolBuilder::new()
    }

    /// Spawns the worker threads.
    ///
    /// Fails with [`PoolError::AlreadyStarted`] on a second call. If the OS refuses a
    /// thread, the workers spawned so far stay with the pool and are joined on drop.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Err(PoolError::AlreadyStarted);
        }
        self.started = true;
        self.workers.reserve_exact(self.num_threads);

        for id in 0..self.num_threads {
            let status = Arc::new(WorkerStatus::new());
            let ctx = WorkerContext {
                id,
                queue: Arc::clone(&self.queue),
                status: Arc::clone(&status),
                panic_policy: self.panic_policy,
                metrics_collector: self.metrics_collector.clone(),
            };

            let mut builder =
                thread::Builder::new().name(format!("{}-{}", self.thread_name_prefix, id));
            if let Some(size) = self.stack_size {
                builder = builder.stack_size(size);
            }
            let handle = builder.spawn(move || worker_loop(ctx))?;
            self.workers.push(WorkerHandle::new(id, status, handle));
        }

        debug!("thread pool started with {} workers", self.num_threads);
        Ok(())
    }

    /// Queues `f` for execution by some worker and returns immediately.
    ///
    /// Submitting before [`start`](Self::start) is fine; the task waits in the queue.
    /// Once the pool is stopped the task is dropped and [`PoolError::Stopped`] returned.
    pub fn submit<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let task: BoxedTask = Box::new(f);
        // Count the task before a worker can see it, so `on_task_started` never runs first.
        if let Some(m) = self.metrics_collector.as_ref() {
            m.on_task_submitted();
        }
        self.queue.enqueue(task).map_err(|e| {
            warn!("task submitted to a stopped thread pool was rejected");
            if let Some(m) = self.metrics_collector.as_ref() {
                m.on_task_rejected();
            }
            e
        })
    }

    /// Signals the workers to exit once the queue is drained. Does not wait.
    pub fn stop(&self) {
        if self.queue.request_stop() {
            debug!("thread pool stop requested");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.queue.is_stopped()
    }

    /// Stops the pool and waits for every worker to exit.
    pub fn shutdown(self) {
        drop(self);
    }

    /// The configured worker count. After a failed [`start`](Self::start) fewer workers may
    /// exist; see [`spawned_workers`](Self::spawned_workers).
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Worker threads actually spawned by [`start`](Self::start).
    pub fn spawned_workers(&self) -> usize {
        self.workers.len()
    }

    /// Number of submitted tasks no worker has taken yet.
    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    pub fn workers(&self) -> Vec<WorkerSnapshot> {
        self.workers.iter().map(WorkerHandle::snapshot).collect()
    }

    /// Workers whose loop is still running. Drops below `num_threads` when a task panic
    /// kills a worker under [`PanicPolicy::Propagate`], or once the pool is drained.
    pub fn live_workers(&self) -> usize {
        self.workers
            .iter()
            .filter(|w| w.snapshot().state != WorkerState::Terminated)
            .count()
    }

    pub fn panic_policy(&self) -> PanicPolicy {
        self.panic_policy
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.stop();
        for worker in &mut self.workers {
            worker.join();
        }

        let discarded = self.queue.len();
        if discarded > 0 {
            warn!(
                "thread pool dropped with {} queued tasks never executed",
                discarded
            );
        }
        debug!("thread pool torn down");
    }
}

/// Configuration for a [`ThreadPool`].
pub struct ThreadPoolBuilder {
    num_threads: usize,
    thread_name_prefix: String,
    stack_size: Option<usize>,
    panic_policy: PanicPolicy,
    metrics_collector: Option<Arc<dyn MetricsCollector>>,
}

impl ThreadPoolBuilder {
    pub fn new() -> Self {
        Self {
            num_threads: DEFAULT_NUM_THREADS,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
            stack_size: None,
            panic_policy: PanicPolicy::default(),
            metrics_collector: None,
        }
    }

    pub fn num_threads(mut self, n: usize) -> Self {
        self.num_threads = n;
        self
    }

    /// Worker threads are named `<prefix>-<id>`.
    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    pub fn panic_policy(mut self, policy: PanicPolicy) -> Self {
        self.panic_policy = policy;
        self
    }

    pub fn with_metrics_collector(mut self, collector: Arc<dyn MetricsCollector>) -> Self {
        self.metrics_collector = Some(collector);
        self
    }

    /// Builds the pool without spawning any thread.
    pub fn build(self) -> ThreadPool {
        ThreadPool {
            num_threads: self.num_threads,
            queue: Arc::new(SharedQueue::new()),
            workers: Vec::new(),
            started: false,
            thread_name_prefix: self.thread_name_prefix,
            stack_size: self.stack_size,
            panic_policy: self.panic_policy,
            metrics_collector: self.metrics_collector,
        }
    }

    /// Builds the pool and starts its workers.
    pub fn build_started(self) -> Result<ThreadPool> {
        let mut pool = self.build();
        pool.start()?;
        Ok(pool)
    }
}

impl Default for ThreadPoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}
