use std::collections::{HashSet, VecDeque};

/// FIFO of keys awaiting recomputation. A key is queued at most once.
#[derive(Debug, Default)]
pub struct Backlog {
    queue: VecDeque<String>,
    queued: HashSet<String>,
}

impl Backlog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key` unless it is already queued. Returns `true` when appended.
    pub fn push(&mut self, key: &str) -> bool {
        if self.queued.contains(key) {
            return false;
        }
        self.queued.insert(key.to_string());
        self.queue.push_back(key.to_string());
        true
    }

    pub fn pop(&mut self) -> Option<String> {
        let key = self.queue.pop_front()?;
        self.queued.remove(&key);
        Some(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.queued.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.queued.clear();
    }
}
