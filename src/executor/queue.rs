//! Shared work queue
//!
//! Holds the pending tasks of a run. It is filled before the workers start
//! and only drained afterwards.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use crate::models::Task;

/// Thread-safe queue of pending tasks
#[derive(Debug, Default)]
pub struct WorkQueue {
    tasks: Mutex<VecDeque<Task>>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, task: Task) {
        self.lock().push_back(task);
    }

    /// Take the next task, or `None` once the queue is drained
    ///
    /// Never blocks waiting for work. A worker that saw `is_empty() == false`
    /// may still get `None` here if another worker took the last task.
    pub fn try_pop(&self) -> Option<Task> {
        self.lock().pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Task>> {
        // A panic while holding this lock cannot leave the deque half-updated.
        self.tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FromIterator<Task> for WorkQueue {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self {
            tasks: Mutex::new(iter.into_iter().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_push_pop() {
        let queue = WorkQueue::new();
        assert!(queue.is_empty());

        queue.push(Task::new("a", "t1"));
        queue.push(Task::new("a", "t2"));
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.try_pop(), Some(Task::new("a", "t1")));
        assert_eq!(queue.try_pop(), Some(Task::new("a", "t2")));
        assert_eq!(queue.try_pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_concurrent_drain_hands_out_each_task_once() {
        let queue: Arc<WorkQueue> = Arc::new(
            (0..1000)
                .map(|i| Task::new("suite", format!("t{i}")))
                .collect(),
        );

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let queue = queue.clone();
                thread::spawn(move || {
                    let mut taken = Vec::new();
                    while let Some(task) = queue.try_pop() {
                        taken.push(task);
                    }
                    taken
                })
            })
            .collect();

        let mut seen = HashSet::new();
        let mut total = 0;
        for handle in handles {
            for task in handle.join().unwrap() {
                total += 1;
                seen.insert(task);
            }
        }

        assert_eq!(total, 1000);
        assert_eq!(seen.len(), 1000);
        assert!(queue.is_empty());
    }
}
