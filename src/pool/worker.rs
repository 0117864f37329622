//! Worker logic for the thread pool

use super::task::{run_task, BoxedTask, PanicPolicy, TaskOutcome};
use crate::metrics::MetricsCollector;
use crate::queue::SharedQueue;
use log::{debug, error, trace};
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Where a worker currently is in its loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Blocked on the queue, or about to be.
    Waiting,
    /// Executing a task.
    Running,
    /// The loop has exited; the thread is finished or unwinding.
    Terminated,
}

impl WorkerState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => WorkerState::Waiting,
            1 => WorkerState::Running,
            _ => WorkerState::Terminated,
        }
    }
}

/// State shared between a worker thread and its handle.
#[derive(Debug)]
pub(crate) struct WorkerStatus {
    state: AtomicU8,
    tasks_run: AtomicUsize,
}

impl WorkerStatus {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(WorkerState::Waiting as u8),
            tasks_run: AtomicUsize::new(0),
        }
    }

    fn set(&self, state: WorkerState) {
        self.state.store(state as u8, Ordering::Release);
    }

    pub fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn tasks_run(&self) -> usize {
        self.tasks_run.load(Ordering::Acquire)
    }
}

/// Point-in-time view of one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSnapshot {
    pub id: usize,
    pub state: WorkerState,
    /// Tasks this worker has dequeued, including ones that panicked.
    pub tasks_run: usize,
}

pub struct WorkerHandle {
    id: usize,
    status: Arc<WorkerStatus>,
    thread: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    pub(crate) fn new(
        id: usize,
        status: Arc<WorkerStatus>,
        thread: thread::JoinHandle<()>,
    ) -> Self {
        Self {
            id,
            status,
            thread: Some(thread),
        }
    }

    pub fn snapshot(&self) -> WorkerSnapshot {
        WorkerSnapshot {
            id: self.id,
            state: self.status.state(),
            tasks_run: self.status.tasks_run(),
        }
    }

    /// Waits for the thread to exit. Later calls do nothing.
    pub fn join(&mut self) {
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                error!("worker {} terminated by a task panic", self.id);
            }
        }
    }
}

/// Everything a worker thread needs, moved into the thread at spawn.
pub(crate) struct WorkerContext {
    pub id: usize,
    pub queue: Arc<SharedQueue>,
    pub status: Arc<WorkerStatus>,
    pub panic_policy: PanicPolicy,
    pub metrics_collector: Option<Arc<dyn MetricsCollector>>,
}

// Marks the worker terminated on every exit path, unwinding included.
struct ExitGuard<'a> {
    ctx: &'a WorkerContext,
}

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        self.ctx.status.set(WorkerState::Terminated);
        if let Some(m) = self.ctx.metrics_collector.as_ref() {
            m.on_worker_stopped();
        }
        if thread::panicking() {
            debug!("worker {} unwinding", self.ctx.id);
        } else {
            debug!("worker {} exiting", self.ctx.id);
        }
    }
}

/// Worker thread main loop
pub(crate) fn worker_loop(ctx: WorkerContext) {
    if let Some(m) = ctx.metrics_collector.as_ref() {
        m.on_worker_started();
    }
    let _guard = ExitGuard { ctx: &ctx };
    debug!("worker {} started", ctx.id);

    while let Some(task) = ctx.queue.take_or_wait() {
        execute(&ctx, task);
    }
}

fn execute(ctx: &WorkerContext, task: BoxedTask) {
    ctx.status.set(WorkerState::Running);
    ctx.status.tasks_run.fetch_add(1, Ordering::AcqRel);
    if let Some(m) = ctx.metrics_collector.as_ref() {
        m.on_task_started();
    }
    trace!("worker {} running task", ctx.id);

    let outcome = run_task(task, ctx.panic_policy, |msg| {
        error!("worker {}: task panicked: {}", ctx.id, msg);
        if let Some(m) = ctx.metrics_collector.as_ref() {
            m.on_task_panicked();
        }
    });

    if outcome == TaskOutcome::Completed {
        if let Some(m) = ctx.metrics_collector.as_ref() {
            m.on_task_completed();
        }
    }
    ctx.status.set(WorkerState::Waiting);
}
