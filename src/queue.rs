//! Blocking FIFO queue shared between producers and workers.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::errors::{PoolError, Result};
use crate::pool::task::BoxedTask;

struct QueueState {
    tasks: VecDeque<BoxedTask>,
    // Monotone: false -> true, never reset.
    stopped: bool,
}

/// Task queue plus stop flag, guarded by a single lock.
///
/// Workers block in [`take_or_wait`](SharedQueue::take_or_wait) until there is work or
/// the queue is stopped. Tasks already queued when the stop flag is raised are still
/// handed out; new submissions after that point are rejected.
pub struct SharedQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl SharedQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                tasks: VecDeque::new(),
                stopped: false,
            }),
            available: Condvar::new(),
        }
    }

    // Tasks never run while the lock is held, so a poisoned guard is still consistent.
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a task to the back of the queue and wakes one waiting worker.
    pub fn enqueue(&self, task: BoxedTask) -> Result<()> {
        let mut state = self.lock();
        if state.stopped {
            return Err(PoolError::Stopped);
        }
        state.tasks.push_back(task);
        drop(state);
        self.available.notify_one();
        Ok(())
    }

    /// Blocks until a task is available or the queue is stopped and drained.
    ///
    /// Returns `None` only when the stop flag is set and no task remains.
    pub fn take_or_wait(&self) -> Option<BoxedTask> {
        let state = self.lock();
        let mut state = self
            .available
            .wait_while(state, |s| !s.stopped && s.tasks.is_empty())
            .unwrap_or_else(PoisonError::into_inner);
        state.tasks.pop_front()
    }

    /// Raises the stop flag and wakes every waiter.
    ///
    /// Returns `true` if this call performed the transition.
    pub fn request_stop(&self) -> bool {
        let mut state = self.lock();
        let first = !state.stopped;
        state.stopped = true;
        drop(state);
        self.available.notify_all();
        first
    }

    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// Number of tasks queued but not yet taken by a worker.
    pub fn len(&self) -> usize {
        self.lock().tasks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SharedQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_fifo_order() {
        let queue = SharedQueue::new();
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        for i in 0..5 {
            let order = Arc::clone(&order);
            queue
                .enqueue(Box::new(move || order.lock().unwrap().push(i)))
                .unwrap();
        }
        assert_eq!(queue.len(), 5);
        while !queue.is_empty() {
            (queue.take_or_wait().unwrap())();
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_drains_after_stop() {
        let queue = SharedQueue::new();
        queue.enqueue(Box::new(|| {})).unwrap();
        queue.enqueue(Box::new(|| {})).unwrap();
        assert!(queue.request_stop());

        assert!(queue.take_or_wait().is_some());
        assert!(queue.take_or_wait().is_some());
        assert!(queue.take_or_wait().is_none());
    }

    #[test]
    fn test_rejects_after_stop() {
        let queue = SharedQueue::new();
        queue.request_stop();
        assert!(matches!(
            queue.enqueue(Box::new(|| {})),
            Err(PoolError::Stopped)
        ));
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_request_stop_is_idempotent() {
        let queue = SharedQueue::new();
        assert!(!queue.is_stopped());
        assert!(queue.request_stop());
        assert!(!queue.request_stop());
        assert!(queue.is_stopped());
    }

    #[test]
    fn test_waiter_wakes_on_enqueue() {
        let queue = Arc::new(SharedQueue::new());
        let hits = Arc::new(AtomicUsize::new(0));

        let waiter = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let task = queue.take_or_wait().expect("task expected");
                task();
            })
        };

        thread::sleep(Duration::from_millis(20));
        let h = Arc::clone(&hits);
        queue
            .enqueue(Box::new(move || {
                h.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        waiter.join().unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stop_wakes_all_waiters() {
        let queue = Arc::new(SharedQueue::new());
        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || queue.take_or_wait().is_none())
            })
            .collect();

        thread::sleep(Duration::from_millis(20));
        queue.request_stop();

        for w in waiters {
            assert!(w.join().unwrap());
        }
    }
}
