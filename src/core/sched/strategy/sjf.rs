//! Shortest-job-first, non-preemptive selection
//!
//! Picks the Ready task with the smallest remaining-work estimate, ties
//! broken by arrival order. A Running task is never preempted.

use crate::core::task::Tcb;
use crate::core::types::{TaskId, TaskState};

#[derive(Debug, Default, Clone, Copy)]
pub struct SjfState;

impl SjfState {
    pub fn select_next(&self, ready: &[&Tcb], current: Option<&Tcb>) -> Option<TaskId> {
        if let Some(cur) = current {
            if cur.state == TaskState::Running {
                return Some(cur.task_id);
            }
        }

        let candidate = ready.iter().min_by(|a, b| {
            a.remaining_work_estimate()
                .partial_cmp(&b.remaining_work_estimate())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.arrival_seq.cmp(&b.arrival_seq))
        })?;
        Some(candidate.task_id)
    }
}
