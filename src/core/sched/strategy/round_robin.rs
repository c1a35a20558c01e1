//! Round-robin selection, priority-blind
//!
//! Maintains its own rotation order over every Ready task, independent of
//! the priority-bucketed `ReadyList` — the strategy is explicitly required
//! to ignore `current_priority` entirely, so walking the bucketed list
//! bucket-by-bucket would defeat the point.

use std::collections::{HashSet, VecDeque};

use crate::core::config::CFG_RR_SLICE_DEFAULT;
use crate::core::task::Tcb;
use crate::core::types::{TaskId, TaskState};

#[derive(Debug, Clone)]
pub struct RoundRobinState {
    rotation: VecDeque<TaskId>,
    members: HashSet<TaskId>,
    slice_duration: f64,
    remaining_slice: f64,
}

impl RoundRobinState {
    pub fn new(slice_duration: f64) -> Self {
        RoundRobinState {
            rotation: VecDeque::new(),
            members: HashSet::new(),
            slice_duration,
            remaining_slice: slice_duration,
        }
    }

    // `ready` never contains the currently Running task (the ReadyList only
    // holds tasks waiting for the CPU), so the Running task's membership
    // must be preserved across the gap explicitly or `retain` below would
    // evict it from the rotation on every single call.
    fn sync(&mut self, ready: &[&Tcb], current_running: Option<TaskId>) {
        let mut present: HashSet<TaskId> = ready.iter().map(|t| t.task_id).collect();
        if let Some(id) = current_running {
            present.insert(id);
        }

        self.rotation.retain(|id| present.contains(id));
        self.members.retain(|id| present.contains(id));

        for tcb in ready {
            if self.members.insert(tcb.task_id) {
                self.rotation.push_back(tcb.task_id);
            }
        }
        if let Some(id) = current_running {
            if self.members.insert(id) {
                self.rotation.push_back(id);
            }
        }
    }

    pub fn select_next(&mut self, ready: &[&Tcb], current: Option<&Tcb>) -> Option<TaskId> {
        let current_running = current
            .filter(|t| t.state == TaskState::Running)
            .map(|t| t.task_id);
        self.sync(ready, current_running);

        if let Some(id) = current_running {
            if self.remaining_slice > 0.0 {
                return Some(id);
            }
        }

        let next = self.rotation.pop_front()?;
        self.rotation.push_back(next);
        self.remaining_slice = self.slice_duration;
        Some(next)
    }

    /// Charge `exec` seconds against the current slice. Returns `true` iff
    /// the slice expired, in which case it is reset for the next dispatch.
    pub fn charge_execution(&mut self, exec: f64) -> bool {
        self.remaining_slice -= exec;
        if self.remaining_slice <= 0.0 {
            self.remaining_slice = self.slice_duration;
            true
        } else {
            false
        }
    }

    pub fn on_task_completed(&mut self, task: TaskId) {
        self.members.remove(&task);
        if let Some(pos) = self.rotation.iter().position(|&t| t == task) {
            self.rotation.remove(pos);
        }
    }

    pub fn reset(&mut self) {
        self.rotation.clear();
        self.members.clear();
        self.remaining_slice = self.slice_duration;
    }
}

impl Default for RoundRobinState {
    fn default() -> Self {
        Self::new(CFG_RR_SLICE_DEFAULT)
    }
}
