//! Error types for the scheduling kernel
//!
//! A small hand-rolled enum rather than a boxed-error crate: call sites
//! want to match on the specific failure, not just print it.

use std::fmt;

/// Scheduler error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedError {
    // ============ Argument errors ============
    /// Priority outside `[0, 254]`
    PriorityOutOfRange,
    /// Negative period
    NegativePeriod,
    /// Negative deadline
    NegativeDeadline,

    // ============ State errors ============
    /// Kernel has not been started
    NotRunning,
    /// Kernel is already running
    AlreadyRunning,
    /// `register_task` called after `start`
    RegistrationClosed,

    // ============ Task lookup errors ============
    /// Referenced `TaskId` is not known to this kernel
    UnknownTask,
}

impl fmt::Display for SchedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedError::PriorityOutOfRange => write!(f, "priority must be in [0, 254]"),
            SchedError::NegativePeriod => write!(f, "period must be >= 0"),
            SchedError::NegativeDeadline => write!(f, "deadline must be >= 0"),
            SchedError::NotRunning => write!(f, "kernel is not running"),
            SchedError::AlreadyRunning => write!(f, "kernel is already running"),
            SchedError::RegistrationClosed => {
                write!(f, "tasks can only be registered before start()")
            }
            SchedError::UnknownTask => write!(f, "task id is not registered with this kernel"),
        }
    }
}

impl std::error::Error for SchedError {}

/// Result type alias for scheduler operations
pub type SchedResult<T> = Result<T, SchedError>;
