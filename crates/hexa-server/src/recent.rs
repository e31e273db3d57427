//! In-process record of recently asked questions.
//!
//! This is the fast, non-persistent view of query history. It is shared by
//! every request handler, bounded by a fixed capacity, and reset on restart.
//! The durable log lives in the history store and is not kept in sync.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Bounded ring buffer of raw question strings.
///
/// Uses `std::sync::Mutex`: every critical section is a single push or copy
/// and never spans an `.await`.
#[derive(Clone, Debug)]
pub struct RecentQueries {
    inner: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl RecentQueries {
    /// Creates an empty buffer holding at most `capacity` entries. A capacity
    /// of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records a question, evicting the oldest entry when full.
    pub fn push(&self, question: impl Into<String>) {
        let mut queue = self.lock();
        if queue.len() == self.capacity {
            queue.pop_front();
        }
        queue.push_back(question.into());
    }

    /// Returns the recorded questions, most recent first.
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<String>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                // A panic mid-push leaves at worst one missing entry.
                tracing::error!("recent query lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}
