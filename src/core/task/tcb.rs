//! Task Control Block (TCB) definition
//!
//! The TCB holds everything the kernel needs to schedule a task; only the
//! kernel ever holds a `&mut Tcb`.

use super::Task;
use crate::core::types::{DeadlineKind, Priority, TaskId, TaskState, VirtualTime};

/// Task Control Block
pub struct Tcb {
    /// Unique, monotonic identity assigned at registration
    pub task_id: TaskId,
    /// The owned application task
    pub(crate) task: Box<dyn Task>,
    /// Registration order, used by FCFS/SJF tie-breaking
    pub arrival_seq: u64,

    // ============ Scheduling ============
    /// Priority assigned at registration; 0 = highest, 255 = Idle
    pub base_priority: Priority,
    /// Priority actually used for dispatch; may be boosted via [`Tcb::inherit`]
    pub current_priority: Priority,
    /// Hard/soft/none deadline classification
    pub deadline_kind: DeadlineKind,

    // ============ Timing ============
    /// Activation period in seconds; `0` means aperiodic
    pub period: VirtualTime,
    /// Relative deadline in seconds; defaults to `period` when unspecified
    pub relative_deadline: VirtualTime,
    /// Virtual time at which this task's next job is activated
    pub next_activation_time: VirtualTime,
    /// Absolute deadline of the current job instance (`0` = none tracked)
    pub absolute_deadline: VirtualTime,
    /// Virtual time at which the current job's last execution step started
    pub last_execution_start: VirtualTime,

    // ============ State ============
    /// Current lifecycle state
    pub state: TaskState,

    // ============ Statistics ============
    /// Number of steps executed across the task's lifetime
    pub execution_count: u64,
    /// Total virtual execution time charged to this task
    pub total_execution_time: VirtualTime,
    /// Largest single-step execution time observed (high-water mark)
    pub worst_case_execution_time: VirtualTime,
    /// Number of deadline misses recorded against this task
    pub deadline_miss_count: u32,
    /// Reserved for a future variance/EWMA jitter estimator; left at zero
    pub jitter: VirtualTime,
}

impl Tcb {
    pub(crate) fn new(
        task_id: TaskId,
        task: Box<dyn Task>,
        arrival_seq: u64,
        base_priority: Priority,
        period: VirtualTime,
        relative_deadline: VirtualTime,
        deadline_kind: DeadlineKind,
    ) -> Self {
        Tcb {
            task_id,
            task,
            arrival_seq,
            base_priority,
            current_priority: base_priority,
            deadline_kind,
            period,
            relative_deadline,
            next_activation_time: 0.0,
            absolute_deadline: 0.0,
            last_execution_start: 0.0,
            state: TaskState::Created,
            execution_count: 0,
            total_execution_time: 0.0,
            worst_case_execution_time: 0.0,
            deadline_miss_count: 0,
            jitter: 0.0,
        }
    }

    #[inline]
    pub fn task(&self) -> &dyn Task {
        self.task.as_ref()
    }

    #[inline]
    pub(crate) fn task_mut(&mut self) -> &mut dyn Task {
        self.task.as_mut()
    }

    #[inline]
    pub fn is_periodic(&self) -> bool {
        self.period > 0.0
    }

    /// Estimated remaining work for the current job, used by the SJF
    /// strategy: the number of unexecuted steps times the current step's
    /// WCET, for tasks that report a roughly uniform per-step cost.
    pub fn remaining_work_estimate(&self) -> VirtualTime {
        let remaining_steps = self
            .task
            .total_steps()
            .saturating_sub(self.task.current_step());
        remaining_steps as f64 * self.task.current_step_wcet()
    }

    /// Lower `current_priority` to `min(current_priority, p)`. Priority
    /// inheritance never raises a TCB's effective priority.
    pub fn inherit(&mut self, p: Priority) {
        if p < self.current_priority {
            self.current_priority = p;
        }
    }

    /// Reset `current_priority` back to `base_priority`.
    pub fn restore(&mut self) {
        self.current_priority = self.base_priority;
    }

    pub(crate) fn record_execution_start(&mut self, t: VirtualTime) {
        self.last_execution_start = t;
    }

    pub(crate) fn record_execution_complete(&mut self, exec: VirtualTime) {
        self.execution_count += 1;
        self.total_execution_time += exec;
        if exec > self.worst_case_execution_time {
            self.worst_case_execution_time = exec;
        }
    }

    pub(crate) fn record_deadline_miss(&mut self) {
        self.deadline_miss_count += 1;
        self.task.on_deadline_miss();
    }

    /// Debug-only validation of the state transition table. Release
    /// builds trust the kernel's call sites and skip the check entirely.
    #[cfg(debug_assertions)]
    pub(crate) fn debug_assert_transition(&self, to: TaskState) {
        use TaskState::*;
        let valid = matches!(
            (self.state, to),
            (Created, Ready)
                | (Created, Waiting)
                | (Ready, Running)
                | (Running, Ready)
                | (Ready, Waiting)
                | (Running, Waiting)
                | (Running, Blocked)
                | (Blocked, Ready)
                | (Waiting, Ready)
                | (_, Suspended)
        );
        debug_assert!(
            valid,
            "invalid TCB transition {:?} -> {:?} for task {:?}",
            self.state, to, self.task_id
        );
    }

    #[cfg(not(debug_assertions))]
    #[inline]
    pub(crate) fn debug_assert_transition(&self, _to: TaskState) {}

    pub(crate) fn transition(&mut self, to: TaskState) {
        self.debug_assert_transition(to);
        self.state = to;
    }
}

impl std::fmt::Debug for Tcb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tcb")
            .field("task_id", &self.task_id)
            .field("name", &self.task.name())
            .field("base_priority", &self.base_priority)
            .field("current_priority", &self.current_priority)
            .field("state", &self.state)
            .finish()
    }
}
