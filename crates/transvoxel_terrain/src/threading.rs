//! Task executor on rayon's global pool.
//!
//! ```ignore
//! let mut executor = TaskExecutor::new();
//!
//! // Queue work (non-blocking)
//! let id = executor.spawn(move || expensive_computation());
//!
//! // Drain finished work each frame
//! for (id, result) in executor.try_drain() {
//!     // ...
//! }
//! ```
//!
//! Results come back over a `crossbeam-channel` in completion order, tagged
//! with the [`TaskId`] returned by `spawn`. Tasks always run to completion;
//! callers that no longer want a result drop it when it arrives.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

/// Unique identifier for a spawned task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
  fn next() -> Self {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    Self(COUNTER.fetch_add(1, Ordering::Relaxed))
  }
}

/// Spawns closures producing `T` and collects their results.
pub struct TaskExecutor<T> {
  sender: Sender<(TaskId, T)>,
  receiver: Receiver<(TaskId, T)>,
  /// Spawned tasks whose result has not been sent yet.
  pending: Arc<AtomicUsize>,
  /// Spawned tasks whose result has not been received yet.
  outstanding: usize,
}

impl<T: Send + 'static> TaskExecutor<T> {
  pub fn new() -> Self {
    let (sender, receiver) = crossbeam_channel::unbounded();
    Self {
      sender,
      receiver,
      pending: Arc::new(AtomicUsize::new(0)),
      outstanding: 0,
    }
  }

  /// Spawn a task on rayon's thread pool (non-blocking).
  pub fn spawn<F>(&mut self, work: F) -> TaskId
  where
    F: FnOnce() -> T + Send + 'static,
  {
    let id = TaskId::next();
    let sender = self.sender.clone();
    let pending = Arc::clone(&self.pending);
    pending.fetch_add(1, Ordering::AcqRel);
    self.outstanding += 1;

    rayon::spawn(move || {
      let result = work();
      // Fails only once the executor is dropped.
      let _ = sender.send((id, result));
      pending.fetch_sub(1, Ordering::AcqRel);
    });

    id
  }

  /// Every result that is ready now.
  pub fn try_drain(&mut self) -> Vec<(TaskId, T)> {
    let done: Vec<_> = self.receiver.try_iter().collect();
    self.outstanding -= done.len();
    done
  }

  /// Block for the next result. Returns `None` once every spawned task has
  /// been received.
  pub fn wait(&mut self) -> Option<(TaskId, T)> {
    if self.outstanding == 0 {
      return None;
    }
    let done = self.receiver.recv().ok()?;
    self.outstanding -= 1;
    Some(done)
  }

  /// Results not yet received by `wait` or `try_drain`.
  pub fn outstanding(&self) -> usize {
    self.outstanding
  }

  /// Tasks queued or running.
  pub fn pending_count(&self) -> usize {
    self.pending.load(Ordering::Acquire)
  }

  /// Results sent but not yet drained.
  pub fn ready_count(&self) -> usize {
    self.receiver.len()
  }

  pub fn num_threads(&self) -> usize {
    rayon::current_num_threads()
  }
}

impl<T: Send + 'static> Default for TaskExecutor<T> {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
#[path = "threading_test.rs"]
mod threading_test;
