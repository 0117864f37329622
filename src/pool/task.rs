//! Task abstraction for the thread pool.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// A type-erased unit of work. Anything it captures is owned by the task.
pub type BoxedTask = Box<dyn FnOnce() + Send + 'static>;

/// What a worker does when a task panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanicPolicy {
    /// Catch the panic at the worker boundary, report it, and keep the worker alive.
    #[default]
    CatchAndReport,
    /// Report the panic, then let it unwind out of the worker. The worker thread
    /// terminates and the pool runs with one fewer thread for the rest of its life.
    Propagate,
}

/// Result of running a single task under [`PanicPolicy::CatchAndReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed,
    /// The task panicked; holds the panic message if one could be extracted.
    Panicked(String),
}

/// Runs `task` to completion.
///
/// A panic is always caught first so the caller can report it. Under
/// [`PanicPolicy::Propagate`] the `on_panic` hook runs and the unwind is resumed,
/// so this function does not return.
pub fn run_task<H>(task: BoxedTask, policy: PanicPolicy, on_panic: H) -> TaskOutcome
where
    H: FnOnce(&str),
{
    match panic::catch_unwind(AssertUnwindSafe(task)) {
        Ok(()) => TaskOutcome::Completed,
        Err(payload) => {
            let message = panic_message(&*payload);
            on_panic(&message);
            match policy {
                PanicPolicy::CatchAndReport => TaskOutcome::Panicked(message),
                PanicPolicy::Propagate => panic::resume_unwind(payload),
            }
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}
