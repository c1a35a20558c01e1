//! Core type definitions for the scheduling kernel
//!
//! These types provide strong typing for scheduler primitives.

use serde::Serialize;

/// Task priority (0 = highest priority, 255 reserved for Idle)
pub type Priority = u8;

/// Virtual time, in seconds
pub type VirtualTime = f64;

/// Monotonic identity of a registered task, stable for the lifetime of the kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TaskId(pub(crate) u32);

impl TaskId {
    #[inline]
    pub fn value(self) -> u32 {
        self.0
    }
}

/// Lifecycle state of a TCB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskState {
    /// Registered but the kernel has not started yet
    Created,
    /// In the ready list, eligible for dispatch
    Ready,
    /// Currently dispatched on the single core
    Running,
    /// Waiting on a resource (reserved for a future synchronization layer)
    Blocked,
    /// Stopped; will not be scheduled again without external intervention
    Suspended,
    /// Periodic task between jobs, waiting for its next activation
    Waiting,
}

/// Deadline classification of a task, set at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeadlineKind {
    /// Missing it implies system failure from the application's standpoint
    Hard,
    /// Missing it implies degraded service only
    Soft,
    /// No deadline semantics tracked beyond timing statistics
    None,
}

/// Severity of a recorded deadline-miss event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeadlineEventKind {
    /// A soft- or unclassified-deadline miss, below the critical threshold
    Warning,
    /// A hard-deadline miss, below the critical threshold
    Miss,
    /// The task's own miss count has reached the configured critical threshold
    Critical,
}
