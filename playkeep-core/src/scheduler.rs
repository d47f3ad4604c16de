//! One-shot timers for the persistence handlers.
//!
//! Everything runs on the caller's thread: the event loop asks the queue for
//! its next deadline, sleeps until then (or until another event arrives) and
//! dispatches whatever is due.

use std::time::{Duration, Instant};

/// Deferred work the orchestrator asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Timer {
    DebouncedSave,
    LiftSaveSuppression,
    StartupLoad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

pub trait Scheduler {
    fn schedule_after(&mut self, delay: Duration, timer: Timer) -> TimerHandle;

    /// Cancelling a timer that already fired is a no-op
    fn cancel(&mut self, handle: TimerHandle);
}

#[derive(Debug, Clone)]
struct Pending {
    handle: TimerHandle,
    deadline: Instant,
    timer: Timer,
}

/// Deadline-ordered timer list driven by an explicit clock.
#[derive(Debug, Clone)]
pub struct TimerQueue {
    now: Instant,
    pending: Vec<Pending>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new(now: Instant) -> Self {
        Self {
            now,
            pending: Vec::new(),
            next_id: 0,
        }
    }

    /// Move the clock forward. Going backwards is ignored.
    pub fn set_now(&mut self, now: Instant) {
        if now > self.now {
            self.now = now;
        }
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.deadline).min()
    }

    /// Remove and return the earliest timer due at `now`, if any.
    ///
    /// Timers sharing a deadline fire in the order they were scheduled.
    pub fn pop_due(&mut self, now: Instant) -> Option<Timer> {
        self.set_now(now);
        let pos = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.deadline <= self.now)
            .min_by_key(|(_, p)| (p.deadline, p.handle.0))
            .map(|(pos, _)| pos)?;
        Some(self.pending.remove(pos).timer)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Scheduler for TimerQueue {
    fn schedule_after(&mut self, delay: Duration, timer: Timer) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            handle,
            deadline: self.now + delay,
            timer,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|p| p.handle != handle);
    }
}
