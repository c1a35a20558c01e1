//! Fixed-priority preemptive selection
//!
//! Default strategy: pick the numerically smallest `current_priority`
//! among Ready tasks, keeping the Running task on ties to avoid a
//! needless context switch.

use crate::core::task::Tcb;
use crate::core::types::{TaskId, TaskState};

#[derive(Debug, Default, Clone, Copy)]
pub struct PriorityState;

impl PriorityState {
    pub fn select_next(&self, ready: &[&Tcb], current: Option<&Tcb>) -> Option<TaskId> {
        // `ready` is already priority-ascending and FIFO-within-priority
        // (ReadyList::iter_priority_order), so the first element is both
        // the highest priority and the earliest inserted at that priority.
        // Don't re-sort by arrival_seq: that's registration order, not
        // insertion order, and the two diverge once a task completes a job
        // and re-enters its bucket behind an already-Ready lower-seq task.
        let candidate = ready.first();

        match (current, candidate) {
            (Some(cur), Some(candidate))
                if cur.state == TaskState::Running
                    && cur.current_priority <= candidate.current_priority =>
            {
                Some(cur.task_id)
            }
            (_, Some(candidate)) => Some(candidate.task_id),
            // Nothing Ready: let a still-Running task keep going rather than
            // forcing a spurious switch to Idle between its own steps.
            (Some(cur), None) if cur.state == TaskState::Running => Some(cur.task_id),
            (_, None) => None,
        }
    }
}
