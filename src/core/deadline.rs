//! Deadline-miss event log and aggregate counters
//!
//! Keeps a capacity-bounded log of misses so a long-running simulation
//! with persistent misses cannot grow memory without bound — the one
//! allocation-sensitive surface left once the task set is fixed.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::warn;

use crate::core::config::{CFG_DEADLINE_CRITICAL_THRESHOLD, CFG_DEADLINE_LOG_CAPACITY};
use crate::core::types::{DeadlineEventKind, DeadlineKind, TaskId, VirtualTime};

/// A single recorded deadline miss
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DeadlineEvent {
    pub kind: DeadlineEventKind,
    pub task_id: TaskId,
    pub deadline: VirtualTime,
    pub overrun: VirtualTime,
    pub timestamp: VirtualTime,
    pub deadline_kind: DeadlineKind,
}

/// Deadline-miss event log and aggregate counters
pub struct DeadlineManager {
    log: VecDeque<DeadlineEvent>,
    capacity: usize,
    critical_threshold: u32,
    total_miss: u64,
    hard_miss: u64,
    listener: Option<Box<dyn FnMut(&DeadlineEvent) + Send>>,
}

impl DeadlineManager {
    pub fn new() -> Self {
        DeadlineManager {
            log: VecDeque::new(),
            capacity: CFG_DEADLINE_LOG_CAPACITY,
            critical_threshold: CFG_DEADLINE_CRITICAL_THRESHOLD,
            total_miss: 0,
            hard_miss: 0,
            listener: None,
        }
    }

    pub fn set_listener(&mut self, listener: impl FnMut(&DeadlineEvent) + Send + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Record a miss. `task_miss_count` is the task's own running miss
    /// count *after* this occurrence, used for the Critical upgrade.
    pub fn record_miss(
        &mut self,
        task_id: TaskId,
        deadline_kind: DeadlineKind,
        deadline: VirtualTime,
        timestamp: VirtualTime,
        task_miss_count: u32,
    ) {
        let overrun = timestamp - deadline;
        let kind = if task_miss_count >= self.critical_threshold {
            DeadlineEventKind::Critical
        } else {
            match deadline_kind {
                DeadlineKind::Hard => DeadlineEventKind::Miss,
                DeadlineKind::Soft | DeadlineKind::None => DeadlineEventKind::Warning,
            }
        };

        let event = DeadlineEvent {
            kind,
            task_id,
            deadline,
            overrun,
            timestamp,
            deadline_kind,
        };

        self.total_miss += 1;
        if matches!(deadline_kind, DeadlineKind::Hard) {
            self.hard_miss += 1;
        }

        warn!(task = task_id.value(), ?kind, overrun, "deadline missed");

        if let Some(listener) = self.listener.as_mut() {
            listener(&event);
        }

        if self.log.len() == self.capacity {
            self.log.pop_front();
        }
        self.log.push_back(event);
    }

    #[inline]
    pub fn total_miss(&self) -> u64 {
        self.total_miss
    }

    #[inline]
    pub fn hard_miss(&self) -> u64 {
        self.hard_miss
    }

    pub fn events(&self) -> impl Iterator<Item = &DeadlineEvent> {
        self.log.iter()
    }

    pub fn snapshot(&self) -> Vec<DeadlineEvent> {
        self.log.iter().copied().collect()
    }
}

impl Default for DeadlineManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TaskId;

    #[test]
    fn hard_miss_classifies_as_miss() {
        let mut dm = DeadlineManager::new();
        dm.record_miss(TaskId(1), DeadlineKind::Hard, 0.010, 0.012, 1);
        assert_eq!(dm.total_miss(), 1);
        assert_eq!(dm.hard_miss(), 1);
        let ev = dm.events().next().unwrap();
        assert!(matches!(ev.kind, DeadlineEventKind::Miss));
    }

    #[test]
    fn soft_miss_classifies_as_warning() {
        let mut dm = DeadlineManager::new();
        dm.record_miss(TaskId(1), DeadlineKind::Soft, 0.010, 0.012, 1);
        let ev = dm.events().next().unwrap();
        assert!(matches!(ev.kind, DeadlineEventKind::Warning));
    }

    #[test]
    fn threshold_upgrades_to_critical() {
        let mut dm = DeadlineManager::new();
        dm.record_miss(TaskId(1), DeadlineKind::Soft, 0.010, 0.012, CFG_DEADLINE_CRITICAL_THRESHOLD);
        let ev = dm.events().next().unwrap();
        assert!(matches!(ev.kind, DeadlineEventKind::Critical));
    }

    #[test]
    fn log_is_capacity_bounded() {
        let mut dm = DeadlineManager::new();
        for i in 0..(CFG_DEADLINE_LOG_CAPACITY + 10) {
            dm.record_miss(TaskId(i as u32), DeadlineKind::Hard, 0.0, 0.001, 1);
        }
        assert_eq!(dm.snapshot().len(), CFG_DEADLINE_LOG_CAPACITY);
        assert_eq!(dm.total_miss(), (CFG_DEADLINE_LOG_CAPACITY + 10) as u64);
    }
}
