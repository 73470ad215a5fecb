//! Deferred task queue
//!
//! Work scheduled during an operation runs at the start of the next tick, after
//! the operation and everything it triggered have finished.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

type Task<T> = Box<dyn FnOnce(&mut T) + Send>;

/// FIFO of closures run against `T`. Clones share the same queue.
pub struct TaskQueue<T> {
    tasks: Arc<Mutex<VecDeque<Task<T>>>>,
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn push(&self, task: impl FnOnce(&mut T) + Send + 'static) {
        self.tasks.lock().push_back(Box::new(task));
    }

    /// Run everything queued so far. Tasks queued while draining wait for the next call.
    pub fn drain(&self, target: &mut T) -> usize {
        let batch: Vec<Task<T>> = self.tasks.lock().drain(..).collect();
        let count = batch.len();
        for task in batch {
            task(target);
        }
        count
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }
}

impl<T> Clone for TaskQueue<T> {
    fn clone(&self) -> Self {
        Self {
            tasks: self.tasks.clone(),
        }
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
