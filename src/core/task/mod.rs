//! Task behavior contract and control block
//!
//! A `Task` is the application's unit of schedulable work; the kernel
//! never sees anything about a task except the five operations below.

mod tcb;

pub use tcb::Tcb;

/// The behavior contract every schedulable unit of work implements.
///
/// A task does not know its own priority, period, or deadline — those
/// live on the [`Tcb`] that wraps it. A task is split into numbered
/// steps; `current_step` is the task's own program counter and is reset
/// by [`Task::reset_for_next_period`] at the start of each job.
pub trait Task {
    /// Human-readable name, used for logging and diagnostics only.
    fn name(&self) -> &str;

    /// Total number of steps in one job of this task. Finite, `>= 1`.
    fn total_steps(&self) -> u32;

    /// The step the task is currently on, 0-indexed.
    fn current_step(&self) -> u32;

    /// Worst-case execution time of the current step, in seconds, `> 0`.
    fn current_step_wcet(&self) -> f64;

    /// True iff the current job has executed all of its steps.
    fn is_work_complete(&self) -> bool {
        self.current_step() >= self.total_steps()
    }

    /// Called once, when the kernel starts, before the task is ever scheduled.
    fn initialize(&mut self);

    /// Execute exactly one step. Must terminate within `current_step_wcet`
    /// of wall-clock time; the kernel charges virtual time based on the
    /// WCET regardless of how long this call actually takes.
    fn execute_step(&mut self);

    /// Reset the task's step counter at the start of a new job (periodic
    /// re-activation, or after a deadline miss abandons the current job).
    fn reset_for_next_period(&mut self);

    /// Called once, when the kernel stops, for every task that was
    /// successfully initialized.
    fn cleanup(&mut self);

    /// Extension point invoked when this task's job misses its deadline.
    /// The default does nothing; application tasks override it to
    /// perform safing behavior.
    fn on_deadline_miss(&mut self) {}
}
