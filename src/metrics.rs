//! Metrics collection for the thread pool.
//!
//! This module defines the `MetricsCollector` trait for observing the pool's activity,
//! as well as a default implementation backed by atomic counters.

use crossbeam::utils::CachePadded;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A trait for collecting metrics from the thread pool.
///
/// Implementations of this trait provide hooks to track key events in the thread pool,
/// such as task submission, execution, and worker lifecycle changes. Hooks are called
/// from producer and worker threads without any pool lock held.
pub trait MetricsCollector: Send + Sync {
    /// Called when a task is handed to the pool, before any worker can dequeue it.
    fn on_task_submitted(&self);
    /// Called after `on_task_submitted` when the queue refuses the task because the pool
    /// is stopped.
    fn on_task_rejected(&self);
    /// Called when a worker dequeues a task and starts running it.
    fn on_task_started(&self);
    /// Called when a task returns normally.
    fn on_task_completed(&self);
    /// Called when a task panics.
    fn on_task_panicked(&self);
    /// Called when a worker thread enters its loop.
    fn on_worker_started(&self);
    /// Called when a worker thread exits, whether normally or by unwinding.
    fn on_worker_stopped(&self);
}

/// Stores metrics for the thread pool using atomic counters.
///
/// Each counter sits on its own cache line since workers update them concurrently.
#[derive(Default)]
pub struct ThreadPoolMetrics {
    /// Number of tasks currently queued for execution.
    pub queued_tasks: CachePadded<AtomicUsize>,
    /// Number of tasks currently being executed.
    pub running_tasks: CachePadded<AtomicUsize>,
    /// Total number of tasks that returned normally.
    pub completed_tasks: CachePadded<AtomicUsize>,
    /// Total number of tasks that panicked.
    pub panicked_tasks: CachePadded<AtomicUsize>,
    /// Total number of submissions rejected after stop.
    pub rejected_tasks: CachePadded<AtomicUsize>,
    /// Number of worker threads currently alive.
    pub active_threads: CachePadded<AtomicUsize>,
}

impl ThreadPoolMetrics {
    /// Creates a new `ThreadPoolMetrics` instance with all counters initialized to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every counter into a plain value.
    ///
    /// The counters are read one at a time, so the snapshot is not atomic as a whole.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queued_tasks: self.queued_tasks.load(Ordering::SeqCst),
            running_tasks: self.running_tasks.load(Ordering::SeqCst),
            completed_tasks: self.completed_tasks.load(Ordering::SeqCst),
            panicked_tasks: self.panicked_tasks.load(Ordering::SeqCst),
            rejected_tasks: self.rejected_tasks.load(Ordering::SeqCst),
            active_threads: self.active_threads.load(Ordering::SeqCst),
        }
    }
}

/// Point-in-time copy of [`ThreadPoolMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub queued_tasks: usize,
    pub running_tasks: usize,
    pub completed_tasks: usize,
    pub panicked_tasks: usize,
    pub rejected_tasks: usize,
    pub active_threads: usize,
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "queued={} running={} completed={} panicked={} rejected={} active_threads={}",
            self.queued_tasks,
            self.running_tasks,
            self.completed_tasks,
            self.panicked_tasks,
            self.rejected_tasks,
            self.active_threads
        )
    }
}

/// A default implementation of `MetricsCollector` using atomic counters.
///
/// The `AtomicMetricsCollector` is backed by an `Arc<ThreadPoolMetrics>` so the caller can
/// keep reading the counters while the pool owns the collector.
pub struct AtomicMetricsCollector {
    /// Shared metrics storage.
    pub metrics: Arc<ThreadPoolMetrics>,
}

impl AtomicMetricsCollector {
    /// Creates a new `AtomicMetricsCollector` writing into `metrics`.
    pub fn new(metrics: Arc<ThreadPoolMetrics>) -> Self {
        Self { metrics }
    }
}

impl MetricsCollector for AtomicMetricsCollector {
    fn on_task_submitted(&self) {
        self.metrics.queued_tasks.fetch_add(1, Ordering::SeqCst);
    }

    /// Withdraws the task counted by `on_task_submitted`.
    fn on_task_rejected(&self) {
        self.metrics.queued_tasks.fetch_sub(1, Ordering::SeqCst);
        self.metrics.rejected_tasks.fetch_add(1, Ordering::SeqCst);
    }

    /// Moves one task from queued to running.
    fn on_task_started(&self) {
        self.metrics.queued_tasks.fetch_sub(1, Ordering::SeqCst);
        self.metrics.running_tasks.fetch_add(1, Ordering::SeqCst);
    }

    fn on_task_completed(&self) {
        self.metrics.running_tasks.fetch_sub(1, Ordering::SeqCst);
        self.metrics.completed_tasks.fetch_add(1, Ordering::SeqCst);
    }

    fn on_task_panicked(&self) {
        self.metrics.running_tasks.fetch_sub(1, Ordering::SeqCst);
        self.metrics.panicked_tasks.fetch_add(1, Ordering::SeqCst);
    }

    fn on_worker_started(&self) {
        self.metrics.active_threads.fetch_add(1, Ordering::SeqCst);
    }

    fn on_worker_stopped(&self) {
        self.metrics.active_threads.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_tracks_task_lifecycle() {
        let metrics = Arc::new(ThreadPoolMetrics::new());
        let collector = AtomicMetricsCollector::new(Arc::clone(&metrics));

        collector.on_worker_started();
        collector.on_task_submitted();
        collector.on_task_submitted();
        collector.on_task_started();
        collector.on_task_completed();
        collector.on_task_started();
        collector.on_task_panicked();
        collector.on_task_submitted();
        collector.on_task_rejected();

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                queued_tasks: 0,
                running_tasks: 0,
                completed_tasks: 1,
                panicked_tasks: 1,
                rejected_tasks: 1,
                active_threads: 1,
            }
        );
    }

    #[test]
    fn test_snapshot_display() {
        let snap = MetricsSnapshot {
            completed_tasks: 3,
            ..Default::default()
        };
        assert_eq!(
            snap.to_string(),
            "queued=0 running=0 completed=3 panicked=0 rejected=0 active_threads=0"
        );
    }
}
