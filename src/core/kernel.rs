//! The scheduling kernel: virtual clock, task registry, and dispatch loop
//!
//! One `Kernel` is owned by the host; there is no process-wide singleton,
//! so a single process can run several independent simulations side by
//! side.

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::core::config::{CFG_PRIO_IDLE, CFG_TICK_EPSILON};
use crate::core::deadline::DeadlineManager;
use crate::core::error::{SchedError, SchedResult};
use crate::core::sched::{ReadyList, SchedulingStrategy};
use crate::core::statistics::TaskStatistics;
use crate::core::task::{Task, Tcb};
use crate::core::time::TimeManager;
use crate::core::types::{DeadlineKind, Priority, TaskId, TaskState, VirtualTime};

/// The kernel's internal idle task: absorbs whatever budget is left in a
/// tick once nothing else is Ready, in a single step.
struct IdleTask {
    step: u32,
}

impl IdleTask {
    fn new() -> Self {
        IdleTask { step: 0 }
    }
}

impl Task for IdleTask {
    fn name(&self) -> &str {
        "Idle"
    }

    fn total_steps(&self) -> u32 {
        1
    }

    fn current_step(&self) -> u32 {
        self.step
    }

    fn current_step_wcet(&self) -> f64 {
        f64::MAX
    }

    fn initialize(&mut self) {
        self.step = 0;
    }

    fn execute_step(&mut self) {
        self.step = 1;
    }

    fn reset_for_next_period(&mut self) {
        self.step = 0;
    }

    fn cleanup(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CurrentSlot {
    Empty,
    Idle,
    Task(TaskId),
}

/// Point-in-time snapshot of kernel status, for host dashboards
#[derive(Debug, Clone, Copy, Serialize)]
pub struct KernelStatus {
    pub running: bool,
    pub virtual_time: VirtualTime,
    pub total_ticks: u64,
    pub current_task: Option<TaskId>,
    pub registered_task_count: usize,
}

/// The scheduling kernel
pub struct Kernel {
    tcbs: Vec<Tcb>,
    idle: Tcb,
    ready_list: ReadyList,
    strategy: SchedulingStrategy,
    current: CurrentSlot,
    virtual_time: VirtualTime,
    total_ticks: u64,
    running: bool,
    registration_open: bool,
    next_task_id: u32,
    next_arrival_seq: u64,
    time_manager: TimeManager,
    deadline_manager: DeadlineManager,
    statistics: TaskStatistics,
}

impl Kernel {
    pub fn new() -> Self {
        Self::with_strategy(SchedulingStrategy::default())
    }

    pub fn with_strategy(strategy: SchedulingStrategy) -> Self {
        let idle = Tcb::new(
            TaskId(u32::MAX),
            Box::new(IdleTask::new()),
            0,
            CFG_PRIO_IDLE,
            0.0,
            0.0,
            DeadlineKind::None,
        );

        Kernel {
            tcbs: Vec::new(),
            idle,
            ready_list: ReadyList::new(),
            strategy,
            current: CurrentSlot::Empty,
            virtual_time: 0.0,
            total_ticks: 0,
            running: false,
            registration_open: true,
            next_task_id: 0,
            next_arrival_seq: 0,
            time_manager: TimeManager::new(),
            deadline_manager: DeadlineManager::new(),
            statistics: TaskStatistics::new(),
        }
    }

    // ============ Registration & lifecycle ============

    pub fn register_task(
        &mut self,
        task: Box<dyn Task>,
        priority: Priority,
        period: VirtualTime,
        deadline: VirtualTime,
        deadline_kind: DeadlineKind,
    ) -> SchedResult<TaskId> {
        if !self.registration_open {
            return Err(SchedError::RegistrationClosed);
        }
        if priority >= CFG_PRIO_IDLE {
            return Err(SchedError::PriorityOutOfRange);
        }
        if period < 0.0 {
            return Err(SchedError::NegativePeriod);
        }
        if deadline < 0.0 {
            return Err(SchedError::NegativeDeadline);
        }

        let relative_deadline = if deadline == 0.0 { period } else { deadline };

        let task_id = TaskId(self.next_task_id);
        self.next_task_id += 1;
        let arrival_seq = self.next_arrival_seq;
        self.next_arrival_seq += 1;

        let name = task.name().to_string();
        let tcb = Tcb::new(
            task_id,
            task,
            arrival_seq,
            priority,
            period,
            relative_deadline,
            deadline_kind,
        );
        self.tcbs.push(tcb);

        debug!(task = task_id.value(), %name, priority, period, "task registered");
        Ok(task_id)
    }

    pub fn start(&mut self) -> SchedResult<()> {
        if self.running {
            return Err(SchedError::AlreadyRunning);
        }
        self.registration_open = false;

        self.idle.task_mut().initialize();

        for tcb in self.tcbs.iter_mut() {
            tcb.task_mut().initialize();
            if tcb.is_periodic() {
                tcb.next_activation_time = 0.0;
                tcb.transition(TaskState::Waiting);
            } else {
                tcb.transition(TaskState::Ready);
            }
        }

        let to_ready: Vec<(TaskId, Priority)> = self
            .tcbs
            .iter()
            .filter(|t| t.state == TaskState::Ready)
            .map(|t| (t.task_id, t.current_priority))
            .collect();
        for (id, prio) in to_ready {
            self.ready_list.add(id, prio);
        }

        self.running = true;
        self.current = CurrentSlot::Empty;
        info!(task_count = self.tcbs.len(), "kernel started");
        Ok(())
    }

    pub fn stop(&mut self) -> SchedResult<()> {
        if !self.running {
            return Err(SchedError::NotRunning);
        }

        for tcb in self.tcbs.iter_mut() {
            tcb.task_mut().cleanup();
            tcb.transition(TaskState::Suspended);
        }
        self.idle.task_mut().cleanup();
        self.idle.transition(TaskState::Suspended);

        self.ready_list.clear();
        self.strategy.reset();
        self.current = CurrentSlot::Empty;
        self.running = false;
        info!("kernel stopped");
        Ok(())
    }

    // ============ Tick loop ============

    pub fn tick(&mut self, delta: VirtualTime) -> SchedResult<()> {
        if !self.running {
            return Err(SchedError::NotRunning);
        }

        self.total_ticks += 1;
        self.time_manager.update(delta);

        let mut budget = delta;
        while budget > CFG_TICK_EPSILON {
            self.activate_periodic_tasks();
            self.schedule();
            let exec = self.execute_current_step(budget);
            budget -= exec;

            if exec <= 0.0 {
                // Defensive: a zero-cost step would spin the loop forever.
                warn!("tick loop made no progress, aborting remaining budget");
                break;
            }
        }

        self.statistics.accumulate_system_time(delta);
        Ok(())
    }

    fn activate_periodic_tasks(&mut self) {
        let vt = self.virtual_time;
        let mut activated: Vec<(TaskId, Priority)> = Vec::new();

        for tcb in self.tcbs.iter_mut() {
            if tcb.is_periodic() && tcb.state == TaskState::Waiting && vt >= tcb.next_activation_time
            {
                tcb.task_mut().reset_for_next_period();
                tcb.next_activation_time = vt + tcb.period;
                tcb.absolute_deadline = vt + tcb.relative_deadline;
                tcb.transition(TaskState::Ready);
                activated.push((tcb.task_id, tcb.current_priority));
            }
        }

        for (id, prio) in activated {
            trace!(task = id.value(), time = vt, "task activated");
            self.ready_list.add(id, prio);
        }
    }

    fn schedule(&mut self) {
        let ready_ids: Vec<TaskId> = self.ready_list.iter_priority_order().collect();
        let ready_refs: Vec<&Tcb> = ready_ids
            .iter()
            .filter_map(|&id| Self::find(&self.tcbs, id))
            .collect();
        let current_ref = match self.current {
            CurrentSlot::Task(id) => Self::find(&self.tcbs, id),
            _ => None,
        };

        let selection = self.strategy.select_next(&ready_refs, current_ref);

        match (selection, self.current) {
            (Some(id), CurrentSlot::Task(cur)) if id == cur => {}
            (Some(id), _) => self.dispatch(Some(id)),
            (None, CurrentSlot::Idle) => {}
            (None, _) => self.dispatch(None),
        }
    }

    /// Perform a context switch to `incoming` (`None` means Idle).
    fn dispatch(&mut self, incoming: Option<TaskId>) {
        if let CurrentSlot::Task(out_id) = self.current {
            if let Some(tcb) = Self::find_mut(&mut self.tcbs, out_id) {
                tcb.transition(TaskState::Ready);
                self.ready_list.add(tcb.task_id, tcb.current_priority);
            }
        }

        match incoming {
            Some(id) => {
                let prio = Self::find(&self.tcbs, id).map(|t| t.current_priority);
                if let Some(prio) = prio {
                    self.ready_list.remove(id, prio);
                }
                if let Some(tcb) = Self::find_mut(&mut self.tcbs, id) {
                    tcb.transition(TaskState::Running);
                    tcb.record_execution_start(self.virtual_time);
                }
                self.current = CurrentSlot::Task(id);
                debug!(task = id.value(), "context switch");
            }
            None => {
                self.current = CurrentSlot::Idle;
                trace!("entering idle");
            }
        }

        self.statistics.record_context_switch();
    }

    /// Execute one step of whatever is currently dispatched, charging at
    /// most `budget` seconds. Returns the seconds actually charged.
    fn execute_current_step(&mut self, budget: VirtualTime) -> VirtualTime {
        match self.current {
            CurrentSlot::Task(id) => {
                let exec = {
                    let tcb = Self::find_mut(&mut self.tcbs, id).expect("current task missing");
                    let w = tcb.task().current_step_wcet();
                    let exec = w.min(budget);
                    tcb.task_mut().execute_step();
                    tcb.record_execution_complete(exec);
                    exec
                };

                self.virtual_time += exec;
                self.statistics.record_execution(id, exec);

                let slice_expired = self.strategy.charge_execution(exec);

                // Check deadlines right after charging this step, before the
                // completion logic below can move the task out of
                // Ready/Running: a job that finishes and overruns its
                // deadline on the same step must still be caught.
                self.check_deadlines();

                let still_current = matches!(self.current, CurrentSlot::Task(t) if t == id);
                if still_current {
                    let work_complete = Self::find(&self.tcbs, id)
                        .map(|t| t.task().is_work_complete())
                        .unwrap_or(false);

                    if work_complete {
                        self.complete_current_job(id);
                    } else if slice_expired {
                        self.preempt_current(id);
                    }
                }

                exec
            }
            CurrentSlot::Idle => {
                // Idle must not run past the next pending periodic
                // activation: its own WCET is unbounded (it has nothing of
                // its own to finish), but a Waiting task's reactivation
                // would otherwise be skipped over entirely.
                let w = self.idle.task().current_step_wcet();
                let cap = self.next_activation_cap();
                let exec = w.min(budget).min(cap);
                self.idle.task_mut().execute_step();
                self.virtual_time += exec;
                self.statistics.record_idle_time(exec);
                if self.idle.task().is_work_complete() {
                    self.idle.task_mut().reset_for_next_period();
                }
                // A queued Ready task's deadline may lapse while the CPU
                // sits idle; still need to catch it within this tick.
                self.check_deadlines();
                exec
            }
            CurrentSlot::Empty => {
                self.check_deadlines();
                0.0
            }
        }
    }

    fn complete_current_job(&mut self, id: TaskId) {
        if let Some(tcb) = Self::find_mut(&mut self.tcbs, id) {
            if tcb.is_periodic() {
                tcb.transition(TaskState::Waiting);
                tcb.task_mut().reset_for_next_period();
            } else {
                tcb.transition(TaskState::Suspended);
            }
        }
        self.strategy.on_task_completed(id);
        self.current = CurrentSlot::Empty;
        trace!(task = id.value(), "job completed");
    }

    fn preempt_current(&mut self, id: TaskId) {
        if let Some(tcb) = Self::find_mut(&mut self.tcbs, id) {
            tcb.transition(TaskState::Ready);
            self.ready_list.add(tcb.task_id, tcb.current_priority);
        }
        self.current = CurrentSlot::Empty;
    }

    /// Seconds until the soonest pending periodic activation, or `f64::MAX`
    /// if nothing is waiting to reactivate.
    fn next_activation_cap(&self) -> VirtualTime {
        self.tcbs
            .iter()
            .filter(|t| t.is_periodic() && t.state == TaskState::Waiting)
            .map(|t| t.next_activation_time - self.virtual_time)
            .fold(f64::MAX, f64::min)
    }

    fn check_deadlines(&mut self) {
        let vt = self.virtual_time;
        let missed: Vec<TaskId> = self
            .tcbs
            .iter()
            .filter(|t| {
                matches!(t.state, TaskState::Ready | TaskState::Running)
                    && t.absolute_deadline > 0.0
                    && vt > t.absolute_deadline
            })
            .map(|t| t.task_id)
            .collect();

        for id in missed {
            self.handle_deadline_miss(id);
        }
    }

    fn handle_deadline_miss(&mut self, id: TaskId) {
        let was_running = matches!(self.current, CurrentSlot::Task(t) if t == id);
        let prio = Self::find(&self.tcbs, id).map(|t| t.current_priority);

        if let Some(prio) = prio {
            if self.ready_list.contains(id) {
                self.ready_list.remove(id, prio);
            }
        }
        if was_running {
            self.current = CurrentSlot::Empty;
        }

        let (deadline, deadline_kind, miss_count) = {
            let tcb = Self::find_mut(&mut self.tcbs, id).expect("task missing");
            tcb.record_deadline_miss();
            (tcb.absolute_deadline, tcb.deadline_kind, tcb.deadline_miss_count)
        };

        self.statistics.record_deadline_miss(id);
        self.deadline_manager
            .record_miss(id, deadline_kind, deadline, self.virtual_time, miss_count);

        if let Some(tcb) = Self::find_mut(&mut self.tcbs, id) {
            tcb.transition(TaskState::Waiting);
            tcb.task_mut().reset_for_next_period();
        }
        self.strategy.on_task_completed(id);
    }

    fn find(tcbs: &[Tcb], id: TaskId) -> Option<&Tcb> {
        tcbs.iter().find(|t| t.task_id == id)
    }

    fn find_mut(tcbs: &mut [Tcb], id: TaskId) -> Option<&mut Tcb> {
        tcbs.iter_mut().find(|t| t.task_id == id)
    }

    // ============ Introspection ============

    pub fn current_task_id(&self) -> Option<TaskId> {
        match self.current {
            CurrentSlot::Task(id) => Some(id),
            _ => None,
        }
    }

    #[inline]
    pub fn virtual_time(&self) -> VirtualTime {
        self.virtual_time
    }

    #[inline]
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn ready_list(&self) -> &ReadyList {
        &self.ready_list
    }

    #[inline]
    pub fn statistics(&self) -> &TaskStatistics {
        &self.statistics
    }

    #[inline]
    pub fn deadline_manager(&self) -> &DeadlineManager {
        &self.deadline_manager
    }

    #[inline]
    pub fn deadline_manager_mut(&mut self) -> &mut DeadlineManager {
        &mut self.deadline_manager
    }

    #[inline]
    pub fn time_manager(&self) -> &TimeManager {
        &self.time_manager
    }

    #[inline]
    pub fn all_tasks(&self) -> &[Tcb] {
        &self.tcbs
    }

    #[inline]
    pub fn idle_task(&self) -> &Tcb {
        &self.idle
    }

    pub fn task(&self, id: TaskId) -> Option<&Tcb> {
        Self::find(&self.tcbs, id)
    }

    pub fn status(&self) -> KernelStatus {
        KernelStatus {
            running: self.running,
            virtual_time: self.virtual_time,
            total_ticks: self.total_ticks,
            current_task: self.current_task_id(),
            registered_task_count: self.tcbs.len(),
        }
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new()
    }
}
