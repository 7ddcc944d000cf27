//! Cooperative interval timers.
//!
//! Nothing here runs on its own thread. The owner registers interval timers
//! and then drains the due ones with [`Scheduler::next_due`] from its event
//! loop, dispatching each [`Tick`] itself. Cancelling a handle guarantees the
//! timer is never returned again.

use std::time::{Duration, Instant};


/// What a timer is for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Refresh the progress bar and detect the end of the audio.
    Progress,
    /// Accumulate the time spent listening.
    Duration,
    /// Watch for the end of the current bookmark segment.
    Boundary,
}

/// Identifies one registration; never reused by the same scheduler.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Interval registration and cancellation.
pub trait Scheduler {
    /// Fire `tick` every `every`, first firing one interval from now.
    fn schedule_interval(&mut self, every: Duration, tick: Tick) -> TimerHandle;

    /// Cancel a timer. Unknown or already cancelled handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);

    /// Pop the next timer that is due, re-arming it for its next interval.
    fn next_due(&mut self) -> Option<(TimerHandle, Tick)>;

    /// Number of live registrations.
    fn active(&self) -> usize;
}

#[derive(Debug)]
struct Entry {
    handle: TimerHandle,
    tick: Tick,
    every: Duration,
    next_at: Duration,
}

/// Timer bookkeeping shared by the real and the manual clock.
#[derive(Debug, Default)]
struct TimerTable {
    next_id: u64,
    entries: Vec<Entry>,
}

impl TimerTable {
    fn insert(&mut self, now: Duration, every: Duration, tick: Tick) -> TimerHandle {
        // A zero interval would be due forever.
        let every = every.max(Duration::from_millis(1));
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            handle,
            tick,
            every,
            next_at: now + every,
        });
        handle
    }

    fn remove(&mut self, handle: TimerHandle) {
        self.entries.retain(|e| e.handle != handle);
    }

    /// Earliest due entry at `now`. With `catch_up` a late timer keeps its
    /// phase and fires once per missed interval; without it the next firing is
    /// one interval after `now`.
    fn pop_due(&mut self, now: Duration, catch_up: bool) -> Option<(TimerHandle, Tick)> {
        let entry = self
            .entries
            .iter_mut()
            .filter(|e| e.next_at <= now)
            .min_by_key(|e| e.next_at)?;

        entry.next_at = if catch_up {
            entry.next_at + entry.every
        } else {
            now + entry.every
        };
        Some((entry.handle, entry.tick))
    }
}

/// Wall-clock scheduler for the running application.
#[derive(Debug)]
pub struct IntervalClock {
    origin: Instant,
    timers: TimerTable,
}

impl IntervalClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            timers: TimerTable::default(),
        }
    }

    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl Default for IntervalClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for IntervalClock {
    fn schedule_interval(&mut self, every: Duration, tick: Tick) -> TimerHandle {
        let now = self.now();
        self.timers.insert(now, every, tick)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.remove(handle);
    }

    fn next_due(&mut self) -> Option<(TimerHandle, Tick)> {
        let now = self.now();
        // A stalled event loop should not replay a burst of stale ticks.
        self.timers.pop_due(now, false)
    }

    fn active(&self) -> usize {
        self.timers.entries.len()
    }
}

/// Virtual-time scheduler driven by [`ManualClock::advance`].
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Duration,
    timers: TimerTable,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_scheduled(&self, tick: Tick) -> bool {
        self.timers.entries.iter().any(|e| e.tick == tick)
    }
}

#[cfg(test)]
impl Scheduler for ManualClock {
    fn schedule_interval(&mut self, every: Duration, tick: Tick) -> TimerHandle {
        self.timers.insert(self.now, every, tick)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.remove(handle);
    }

    fn next_due(&mut self) -> Option<(TimerHandle, Tick)> {
        self.timers.pop_due(self.now, true)
    }

    fn active(&self) -> usize {
        self.timers.entries.len()
    }
}
