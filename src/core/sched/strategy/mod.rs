//! Pluggable scheduling strategies
//!
//! Exactly one strategy is active per kernel. Modeled as a tagged enum
//! rather than `Box<dyn Trait>` — there is at most one instance per
//! kernel, so a `match` gives the same dispatch a trait object would,
//! while keeping each policy's own state (RR's cursor, FCFS's arrival
//! queue) inline instead of behind another allocation.

mod fcfs;
mod priority;
mod round_robin;
mod sjf;

pub use fcfs::FcfsState;
pub use priority::PriorityState;
pub use round_robin::RoundRobinState;
pub use sjf::SjfState;

use crate::core::config::CFG_RR_SLICE_DEFAULT;
use crate::core::task::Tcb;
use crate::core::types::TaskId;

#[derive(Debug, Clone)]
pub enum SchedulingStrategy {
    Priority(PriorityState),
    RoundRobin(RoundRobinState),
    Fcfs(FcfsState),
    Sjf(SjfState),
}

impl SchedulingStrategy {
    pub fn priority() -> Self {
        SchedulingStrategy::Priority(PriorityState)
    }

    pub fn round_robin(slice_duration: f64) -> Self {
        SchedulingStrategy::RoundRobin(RoundRobinState::new(slice_duration))
    }

    pub fn fcfs() -> Self {
        SchedulingStrategy::Fcfs(FcfsState::default())
    }

    pub fn sjf() -> Self {
        SchedulingStrategy::Sjf(SjfState)
    }

    /// Select the next task to dispatch. `ready` is the set of currently
    /// Ready tasks; `current` is the Running task, if any.
    pub fn select_next(&mut self, ready: &[&Tcb], current: Option<&Tcb>) -> Option<TaskId> {
        match self {
            SchedulingStrategy::Priority(s) => s.select_next(ready, current),
            SchedulingStrategy::RoundRobin(s) => s.select_next(ready, current),
            SchedulingStrategy::Fcfs(s) => s.select_next(ready, current),
            SchedulingStrategy::Sjf(s) => s.select_next(ready, current),
        }
    }

    /// Charge `exec` seconds of execution against the active strategy's
    /// own time accounting. Only the round-robin strategy uses this; the
    /// return value reports whether its slice just expired.
    pub fn charge_execution(&mut self, exec: f64) -> bool {
        match self {
            SchedulingStrategy::RoundRobin(s) => s.charge_execution(exec),
            _ => false,
        }
    }

    pub fn on_task_completed(&mut self, task: TaskId) {
        match self {
            SchedulingStrategy::RoundRobin(s) => s.on_task_completed(task),
            SchedulingStrategy::Fcfs(s) => s.on_task_completed(task),
            SchedulingStrategy::Priority(_) | SchedulingStrategy::Sjf(_) => {}
        }
    }

    pub fn reset(&mut self) {
        match self {
            SchedulingStrategy::Priority(_) => {}
            SchedulingStrategy::RoundRobin(s) => s.reset(),
            SchedulingStrategy::Fcfs(s) => s.reset(),
            SchedulingStrategy::Sjf(_) => {}
        }
    }
}

impl Default for SchedulingStrategy {
    fn default() -> Self {
        SchedulingStrategy::priority()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_priority() {
        matches!(SchedulingStrategy::default(), SchedulingStrategy::Priority(_));
    }

    #[test]
    fn round_robin_constructor_uses_given_slice() {
        let s = SchedulingStrategy::round_robin(CFG_RR_SLICE_DEFAULT);
        match s {
            SchedulingStrategy::RoundRobin(_) => {}
            _ => panic!("expected RoundRobin"),
        }
    }
}
