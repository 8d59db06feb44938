//! Bounded log of player-facing messages.

use std::collections::VecDeque;

/// Keeps the most recent messages, newest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageLog {
    capacity: usize,
    entries: VecDeque<String>,
}

impl MessageLog {
    /// Creates an empty log holding at most `capacity` messages.
    ///
    /// A zero capacity is raised to one so the latest message is always kept.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Records a message, evicting the oldest one when full.
    pub fn push(&mut self, text: &str) {
        self.entries.push_front(text.to_owned());
        self.entries.truncate(self.capacity);
    }

    /// Most recent message.
    #[must_use]
    pub fn latest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    /// Messages from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(String::as_str)
    }

    /// Reports whether any retained message equals `text`.
    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.iter().any(|entry| entry == text)
    }

    /// Number of retained messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained messages.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every message.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
