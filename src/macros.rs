//! # Macros for `fixedpool`
//!
//! Shorthands for building pools and logging their metrics.

/// Creates a thread pool, optionally starting it and choosing a panic policy.
///
/// The `start: true` forms call [`ThreadPoolBuilder::build_started`](crate::ThreadPoolBuilder::build_started)
/// and therefore evaluate to a `Result`.
///
/// # Examples
/// ```rust
/// use fixedpool::{create_thread_pool, PanicPolicy};
///
/// let idle = create_thread_pool!(num_threads: 2);
/// assert!(!idle.is_started());
///
/// let pool = create_thread_pool!(num_threads: 8, start: true).unwrap();
/// assert_eq!(pool.workers().len(), 8);
///
/// let strict = create_thread_pool!(
///     num_threads: 2,
///     panic_policy: PanicPolicy::Propagate,
///     start: true
/// )
/// .unwrap();
/// strict.shutdown();
/// pool.shutdown();
/// ```
#[macro_export]
macro_rules! create_thread_pool {
    (num_threads: $num:expr) => {
        $crate::ThreadPoolBuilder::new().num_threads($num).build()
    };
    (num_threads: $num:expr, start: true) => {
        $crate::ThreadPoolBuilder::new()
            .num_threads($num)
            .build_started()
    };
    (num_threads: $num:expr, panic_policy: $policy:expr) => {
        $crate::ThreadPoolBuilder::new()
            .num_threads($num)
            .panic_policy($policy)
            .build()
    };
    (num_threads: $num:expr, panic_policy: $policy:expr, start: true) => {
        $crate::ThreadPoolBuilder::new()
            .num_threads($num)
            .panic_policy($policy)
            .build_started()
    };
}

/// Logs the current metrics of the thread pool at `info` level.
///
/// # Example
/// ```rust
/// use fixedpool::{metrics::{ThreadPoolMetrics, AtomicMetricsCollector}, ThreadPoolBuilder, log_metrics};
/// use std::sync::Arc;
///
/// let metrics = Arc::new(ThreadPoolMetrics::new());
/// let collector = Arc::new(AtomicMetricsCollector::new(metrics.clone()));
/// let pool = ThreadPoolBuilder::new().with_metrics_collector(collector).build();
///
/// log_metrics!(metrics);
/// pool.shutdown();
/// ```
#[macro_export]
macro_rules! log_metrics {
    ($metrics:expr) => {
        $crate::__log::info!("thread pool metrics: {}", $metrics.snapshot())
    };
}
