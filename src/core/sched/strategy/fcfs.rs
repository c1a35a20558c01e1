//! First-come-first-served, non-preemptive selection
//!
//! A Running task runs to completion; a separate arrival queue records
//! Ready tasks in arrival order, disregarding priority entirely.

use std::collections::{HashSet, VecDeque};

use crate::core::task::Tcb;
use crate::core::types::{TaskId, TaskState};

#[derive(Debug, Default, Clone)]
pub struct FcfsState {
    arrivals: VecDeque<TaskId>,
    members: HashSet<TaskId>,
}

impl FcfsState {
    fn sync(&mut self, ready: &[&Tcb]) {
        let present: HashSet<TaskId> = ready.iter().map(|t| t.task_id).collect();

        self.arrivals.retain(|id| present.contains(id));
        self.members.retain(|id| present.contains(id));

        let mut newcomers: Vec<&&Tcb> = ready
            .iter()
            .filter(|t| !self.members.contains(&t.task_id))
            .collect();
        newcomers.sort_by_key(|t| t.arrival_seq);

        for tcb in newcomers {
            self.members.insert(tcb.task_id);
            self.arrivals.push_back(tcb.task_id);
        }
    }

    pub fn select_next(&mut self, ready: &[&Tcb], current: Option<&Tcb>) -> Option<TaskId> {
        if let Some(cur) = current {
            if cur.state == TaskState::Running {
                return Some(cur.task_id);
            }
        }

        self.sync(ready);
        let next = self.arrivals.pop_front()?;
        self.members.remove(&next);
        Some(next)
    }

    pub fn on_task_completed(&mut self, task: TaskId) {
        self.members.remove(&task);
        if let Some(pos) = self.arrivals.iter().position(|&t| t == task) {
            self.arrivals.remove(pos);
        }
    }

    pub fn reset(&mut self) {
        self.arrivals.clear();
        self.members.clear();
    }
}
