//! Compile-time configuration for the scheduling kernel
//!
//! These constants control the behavior and resource limits of the kernel.

/// Number of priority levels (0..=254 application, 255 Idle)
pub const CFG_PRIO_LEVELS: usize = 256;

/// Idle task priority — always the lowest (numerically largest) level
pub const CFG_PRIO_IDLE: u8 = (CFG_PRIO_LEVELS - 1) as u8;

/// Floating-point guard for the tick loop's budget-draining condition
pub const CFG_TICK_EPSILON: f64 = 1e-5;

/// Default round-robin time slice, in seconds
pub const CFG_RR_SLICE_DEFAULT: f64 = 0.010;

/// Default deadline-miss count at which a DeadlineEvent is classified Critical
pub const CFG_DEADLINE_CRITICAL_THRESHOLD: u32 = 3;

/// Maximum number of DeadlineEvent entries retained in the log
pub const CFG_DEADLINE_LOG_CAPACITY: usize = 256;
