//! # fixedpool
//!
//! `fixedpool` is a fixed-size thread pool: a set of worker threads, spawned once, that
//! consume fire-and-forget tasks from one shared FIFO queue until the pool is stopped.
//!
//! ## Features
//! - Explicit lifecycle: build, `start`, `submit`, `stop`, drop.
//! - Graceful shutdown: tasks queued before `stop` still run.
//! - Workers are always joined when the pool is dropped.
//! - Configurable handling of panicking tasks.
//! - Metrics hooks for monitoring pool activity.
//!
//! ## Usage
//!
//! ### Basic Usage
//! ```rust
//! use fixedpool::ThreadPool;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let counter = Arc::new(AtomicUsize::new(0));
//!
//! let mut pool = ThreadPool::new(4);
//! pool.start().unwrap();
//!
//! for _ in 0..100 {
//!     let counter = Arc::clone(&counter);
//!     pool.submit(move || {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!     })
//!     .unwrap();
//! }
//!
//! // Stops the pool, runs what is still queued, and joins the workers.
//! pool.shutdown();
//! assert_eq!(counter.load(Ordering::SeqCst), 100);
//! ```
//!
//! ### Stopping
//! ```rust
//! use fixedpool::{PoolError, ThreadPool};
//!
//! let mut pool = ThreadPool::new(2);
//! pool.start().unwrap();
//!
//! pool.stop();
//! pool.stop(); // no-op
//! assert!(pool.is_stopped());
//!
//! // Submissions after stop are rejected.
//! assert!(matches!(pool.submit(|| {}), Err(PoolError::Stopped)));
//! ```
//!
//! ### Panicking Tasks
//! ```rust
//! use fixedpool::{PanicPolicy, ThreadPoolBuilder};
//!
//! // The default policy catches the panic and keeps the worker alive.
//! let pool = ThreadPoolBuilder::new()
//!     .num_threads(2)
//!     .panic_policy(PanicPolicy::CatchAndReport)
//!     .build_started()
//!     .unwrap();
//!
//! pool.submit(|| panic!("task failed")).unwrap();
//! pool.shutdown();
//! ```
//!
//! ### Collecting Metrics
//! ```rust
//! use fixedpool::{metrics::{ThreadPoolMetrics, AtomicMetricsCollector}, ThreadPoolBuilder};
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(ThreadPoolMetrics::new());
//! let collector = Arc::new(AtomicMetricsCollector::new(metrics.clone()));
//!
//! let pool = ThreadPoolBuilder::new()
//!     .num_threads(4)
//!     .with_metrics_collector(collector)
//!     .build_started()
//!     .unwrap();
//!
//! for i in 0..5 {
//!     pool.submit(move || println!("Task {} executed", i)).unwrap();
//! }
//! pool.shutdown();
//!
//! assert_eq!(metrics.snapshot().completed_tasks, 5);
//! ```

mod errors;
mod macros;
pub mod metrics;
pub mod pool;
mod queue;

pub use errors::{PoolError, Result};
pub use pool::task::{BoxedTask, PanicPolicy};
pub use pool::{ThreadPool, ThreadPoolBuilder, WorkerSnapshot, WorkerState};

#[doc(hidden)]
pub use log as __log;
