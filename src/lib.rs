//! A virtual-time, preemptive fixed-priority scheduling kernel simulation
//!
//! Drives a set of periodic application tasks structured as short,
//! explicit execution steps: tasks have periods, relative deadlines, a
//! hard/soft classification, and per-step worst-case execution times. The
//! kernel advances a virtual clock, activates periodic tasks, selects the
//! highest-priority ready task via a pluggable strategy, charges execution
//! time against a tick budget, and records deadline misses.
//!
//! Hosted on `std`: no interrupts, no hardware timers, no real clock. Time
//! only moves when a caller asks it to via `Kernel::tick`.

pub mod collaborators;
pub mod core;

pub use collaborators::AircraftState;
pub use crate::core::config;
pub use crate::core::deadline::{DeadlineEvent, DeadlineManager};
pub use crate::core::error::{SchedError, SchedResult};
pub use crate::core::kernel::{Kernel, KernelStatus};
pub use crate::core::sched::{ReadyList, SchedulingStrategy};
pub use crate::core::statistics::{SystemStatsSnapshot, TaskStatistics, TaskStatSnapshot};
pub use crate::core::task::{Task, Tcb};
pub use crate::core::time::{TimeManager, TimerId};
pub use crate::core::types::{DeadlineEventKind, DeadlineKind, Priority, TaskId, TaskState, VirtualTime};
