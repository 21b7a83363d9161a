use crate::prelude::LogKind;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub message: String,
    pub time: String,
    pub kind: LogKind,
}

/// Bounded audit trail, newest entry first.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    capacity: usize,
}

impl ActivityLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Inserts at the head and drops whatever falls past the capacity.
    /// Returns how many entries were evicted.
    pub fn push(&mut self, entry: ActivityEntry) -> usize {
        self.entries.push_front(entry);
        let evicted = self.entries.len().saturating_sub(self.capacity);
        self.entries.truncate(self.capacity);
        evicted
    }

    pub fn latest(&self) -> Option<&ActivityEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityEntry> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn to_vec(&self) -> Vec<ActivityEntry> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::with_capacity(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(message: &str) -> ActivityEntry {
        ActivityEntry {
            message: message.into(),
            time: "00:00:00".into(),
            kind: LogKind::Info,
        }
    }

    #[test]
    fn log_keeps_newest_first_within_capacity() {
        let mut log = ActivityLog::default();
        for i in 0..20 {
            log.push(entry(&format!("event {i}")));
            assert!(log.len() <= 8);
        }

        let messages: Vec<_> = log.iter().map(|e| e.message.clone()).collect();
        let expected: Vec<_> = (12..20).rev().map(|i| format!("event {i}")).collect();
        assert_eq!(messages, expected);
        assert_eq!(log.latest().unwrap().message, "event 19");
    }

    #[test]
    fn push_reports_evictions() {
        let mut log = ActivityLog::with_capacity(2);
        assert_eq!(log.push(entry("a")), 0);
        assert_eq!(log.push(entry("b")), 0);
        assert_eq!(log.push(entry("c")), 1);
        assert_eq!(log.to_vec().last().unwrap().message, "b");
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut log = ActivityLog::with_capacity(0);
        log.push(entry("only"));
        assert_eq!(log.capacity(), 1);
        assert_eq!(log.len(), 1);
    }
}
