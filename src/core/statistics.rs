//! Per-task and system-wide execution statistics
//!
//! Updated on every step execution from the heartbeat thread; snapshots
//! are immutable copies taken behind a `RwLock` so an external reader
//! (e.g. a UI thread) never blocks the scheduling fast path for long.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::Serialize;

use crate::core::types::TaskId;

#[derive(Debug, Clone, Copy, Default)]
struct TaskStat {
    total_exec: f64,
    min_exec: f64,
    max_exec: f64,
    count: u64,
    miss_count: u32,
}

/// Immutable snapshot of one task's statistics
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TaskStatSnapshot {
    pub task_id: TaskId,
    pub total_exec: f64,
    pub min_exec: f64,
    pub max_exec: f64,
    pub avg_exec: f64,
    pub count: u64,
    pub miss_count: u32,
    pub cpu_utilization: f64,
}

/// Immutable snapshot of system-wide statistics
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SystemStatsSnapshot {
    pub system_time: f64,
    pub context_switches: u64,
    pub total_cpu_utilization: f64,
    pub tracked_task_count: usize,
    pub total_idle_time: f64,
}

struct Inner {
    per_task: HashMap<TaskId, TaskStat>,
    system_time: f64,
    context_switches: u64,
    total_idle_time: f64,
}

/// Per-task and system-wide execution statistics
pub struct TaskStatistics {
    inner: RwLock<Inner>,
}

impl TaskStatistics {
    pub fn new() -> Self {
        TaskStatistics {
            inner: RwLock::new(Inner {
                per_task: HashMap::new(),
                system_time: 0.0,
                context_switches: 0,
                total_idle_time: 0.0,
            }),
        }
    }

    /// Record one step's execution for `task_id`.
    pub fn record_execution(&self, task_id: TaskId, exec: f64) {
        let mut inner = self.inner.write().expect("statistics lock poisoned");
        let stat = inner.per_task.entry(task_id).or_insert_with(|| TaskStat {
            min_exec: f64::MAX,
            ..Default::default()
        });
        stat.total_exec += exec;
        stat.count += 1;
        if exec < stat.min_exec {
            stat.min_exec = exec;
        }
        if exec > stat.max_exec {
            stat.max_exec = exec;
        }
    }

    pub fn record_deadline_miss(&self, task_id: TaskId) {
        let mut inner = self.inner.write().expect("statistics lock poisoned");
        inner.per_task.entry(task_id).or_default().miss_count += 1;
    }

    pub fn record_idle_time(&self, idle: f64) {
        let mut inner = self.inner.write().expect("statistics lock poisoned");
        inner.total_idle_time += idle;
    }

    pub fn record_context_switch(&self) {
        let mut inner = self.inner.write().expect("statistics lock poisoned");
        inner.context_switches += 1;
    }

    pub fn accumulate_system_time(&self, delta: f64) {
        let mut inner = self.inner.write().expect("statistics lock poisoned");
        inner.system_time += delta;
    }

    pub fn task_snapshot(&self, task_id: TaskId) -> Option<TaskStatSnapshot> {
        let inner = self.inner.read().expect("statistics lock poisoned");
        let stat = inner.per_task.get(&task_id)?;
        Some(Self::build_snapshot(task_id, stat, inner.system_time))
    }

    pub fn all_task_snapshots(&self) -> Vec<TaskStatSnapshot> {
        let inner = self.inner.read().expect("statistics lock poisoned");
        inner
            .per_task
            .iter()
            .map(|(&id, stat)| Self::build_snapshot(id, stat, inner.system_time))
            .collect()
    }

    pub fn system_snapshot(&self) -> SystemStatsSnapshot {
        let inner = self.inner.read().expect("statistics lock poisoned");
        let total_cpu_utilization = if inner.system_time > 0.0 {
            inner
                .per_task
                .values()
                .map(|s| s.total_exec)
                .sum::<f64>()
                / inner.system_time
                * 100.0
        } else {
            0.0
        };
        SystemStatsSnapshot {
            system_time: inner.system_time,
            context_switches: inner.context_switches,
            total_cpu_utilization,
            tracked_task_count: inner.per_task.len(),
            total_idle_time: inner.total_idle_time,
        }
    }

    fn build_snapshot(task_id: TaskId, stat: &TaskStat, system_time: f64) -> TaskStatSnapshot {
        let avg_exec = if stat.count > 0 {
            stat.total_exec / stat.count as f64
        } else {
            0.0
        };
        let cpu_utilization = if system_time > 0.0 {
            stat.total_exec / system_time * 100.0
        } else {
            0.0
        };
        TaskStatSnapshot {
            task_id,
            total_exec: stat.total_exec,
            min_exec: if stat.count > 0 { stat.min_exec } else { 0.0 },
            max_exec: stat.max_exec,
            avg_exec,
            count: stat.count,
            miss_count: stat.miss_count,
            cpu_utilization,
        }
    }
}

impl Default for TaskStatistics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_min_max_avg() {
        let stats = TaskStatistics::new();
        let id = TaskId(1);
        stats.record_execution(id, 0.002);
        stats.record_execution(id, 0.008);
        stats.accumulate_system_time(0.100);

        let snap = stats.task_snapshot(id).unwrap();
        assert_eq!(snap.count, 2);
        assert!((snap.min_exec - 0.002).abs() < 1e-9);
        assert!((snap.max_exec - 0.008).abs() < 1e-9);
        assert!((snap.avg_exec - 0.005).abs() < 1e-9);
    }

    #[test]
    fn idle_time_excluded_from_per_task() {
        let stats = TaskStatistics::new();
        stats.record_idle_time(0.030);
        let sys = stats.system_snapshot();
        assert!((sys.total_idle_time - 0.030).abs() < 1e-9);
        assert_eq!(sys.tracked_task_count, 0);
    }
}
