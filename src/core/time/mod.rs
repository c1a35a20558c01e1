//! Wall-clock time services: timeouts, intervals, and the tick counter
//!
//! `TimeManager` tracks a wall-clock accumulator and a monotonic tick
//! counter, separate from the kernel's own virtual clock — it exists to
//! serve host-side callbacks (UI refresh, telemetry export), not
//! scheduling decisions. The timer table sits behind a `Mutex` because
//! `update` runs on the heartbeat thread while `cancel` may be called
//! from an external thread.

use std::sync::Mutex;

/// Opaque handle to a registered timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

enum TimerKind {
    Oneshot,
    Interval(f64),
}

struct Timer {
    id: TimerId,
    fires_at: f64,
    kind: TimerKind,
    callback: Box<dyn FnMut() + Send>,
}

struct Timers {
    entries: Vec<Timer>,
    next_id: u64,
}

/// Wall-clock bookkeeping and logical timer callbacks
pub struct TimeManager {
    current_time: f64,
    tick_count: u64,
    timers: Mutex<Timers>,
}

impl TimeManager {
    pub fn new() -> Self {
        TimeManager {
            current_time: 0.0,
            tick_count: 0,
            timers: Mutex::new(Timers {
                entries: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Advance wall-clock time by `delta` seconds, incrementing the tick
    /// counter and firing any timers due.
    pub fn update(&mut self, delta: f64) {
        self.current_time += delta;
        self.tick_count += 1;

        let mut timers = self.timers.lock().expect("timer table poisoned");
        let now = self.current_time;

        let mut i = 0;
        while i < timers.entries.len() {
            if timers.entries[i].fires_at <= now {
                let mut timer = timers.entries.remove(i);
                (timer.callback)();
                if let TimerKind::Interval(period) = timer.kind {
                    timer.fires_at = now + period;
                    timers.entries.push(timer);
                }
            } else {
                i += 1;
            }
        }
    }

    #[inline]
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Register a one-shot timer that fires once `delay` seconds from now.
    pub fn set_timeout(&self, delay: f64, callback: impl FnMut() + Send + 'static) -> TimerId {
        let mut timers = self.timers.lock().expect("timer table poisoned");
        let id = TimerId(timers.next_id);
        timers.next_id += 1;
        timers.entries.push(Timer {
            id,
            fires_at: self.current_time + delay,
            kind: TimerKind::Oneshot,
            callback: Box::new(callback),
        });
        id
    }

    /// Register a periodic timer that fires every `period` seconds,
    /// starting `period` seconds from now.
    pub fn set_interval(&self, period: f64, callback: impl FnMut() + Send + 'static) -> TimerId {
        let mut timers = self.timers.lock().expect("timer table poisoned");
        let id = TimerId(timers.next_id);
        timers.next_id += 1;
        timers.entries.push(Timer {
            id,
            fires_at: self.current_time + period,
            kind: TimerKind::Interval(period),
            callback: Box::new(callback),
        });
        id
    }

    /// Cancel a timer by id. A no-op if the id is unknown or already fired
    /// (and was a one-shot).
    pub fn cancel(&self, id: TimerId) {
        let mut timers = self.timers.lock().expect("timer table poisoned");
        timers.entries.retain(|t| t.id != id);
    }
}

impl Default for TimeManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn oneshot_fires_once() {
        let tm = TimeManager::new();
        let count = Arc::new(AtomicU32::new(0));
        let c = count.clone();
        tm.set_timeout(0.010, move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        let mut tm = tm;
        tm.update(0.005);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        tm.update(0.010);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        tm.update(0.010);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn interval_refires() {
        let mut tm = TimeManager::new();
        let count = Arc::new(AtomicU32::new(0));
        let c = count.clone();
        tm.set_interval(0.010, move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        tm.update(0.010);
        tm.update(0.010);
        tm.update(0.010);
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn cancel_prevents_fire() {
        let mut tm = TimeManager::new();
        let count = Arc::new(AtomicU32::new(0));
        let c = count.clone();
        let id = tm.set_timeout(0.010, move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        tm.cancel(id);
        tm.update(0.020);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
