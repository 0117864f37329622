//! Error types for the thread pool.
//!
//! This module defines errors that may occur while configuring, starting, or submitting
//! work to the thread pool. Tasks themselves have no error type: a task that panics is
//! handled by the pool's [`PanicPolicy`](crate::PanicPolicy).

use std::io;
use thiserror::Error;

/// Represents errors that can occur in the thread pool.
#[derive(Error, Debug)]
pub enum PoolError {
    /// The pool has been stopped and no new tasks can be accepted.
    #[error("thread pool is stopped")]
    Stopped,

    /// `start` was called on a pool whose workers are already spawned.
    #[error("thread pool is already started")]
    AlreadyStarted,

    /// A negative worker count was requested.
    #[error("invalid thread count: {0}")]
    InvalidThreadCount(i64),

    /// The operating system refused to spawn a worker thread.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),
}

/// Result type alias for thread pool operations.
pub type Result<T> = std::result::Result<T, PoolError>;
