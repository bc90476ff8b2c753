//! One-shot countdown timeout.
//!
//! Armed with a duration, decremented by one scheduler period per tick, and
//! yields its configured completion action exactly once when the remaining
//! time reaches zero.  Restarting replaces the remaining time; cancelling
//! drops it without firing.
//!
//! Durations are snapped down to a whole number of ticks so the countdown
//! always lands on zero exactly.

use log::debug;

#[derive(Debug, Clone)]
pub struct Countdown<A> {
    tick_ms: u32,
    remaining_ms: u32,
    active: bool,
    action: A,
}

impl<A: Copy + core::fmt::Debug> Countdown<A> {
    /// `tick_ms` must match the period of the task that calls [`tick`].
    /// A zero period is treated as 1 ms.
    ///
    /// [`tick`]: Countdown::tick
    pub fn new(tick_ms: u32, action: A) -> Self {
        Self {
            tick_ms: tick_ms.max(1),
            remaining_ms: 0,
            active: false,
            action,
        }
    }

    /// Arm (or re-arm) the countdown.  A duration shorter than one tick
    /// fires on the next tick.
    pub fn start(&mut self, duration_ms: u32) {
        self.remaining_ms = duration_ms - duration_ms % self.tick_ms;
        self.active = true;
        debug!(
            "Countdown: {:?} armed for {} ms (requested {})",
            self.action, self.remaining_ms, duration_ms
        );
    }

    /// Disarm without firing.
    pub fn cancel(&mut self) {
        if self.active {
            debug!("Countdown: {:?} cancelled with {} ms left", self.action, self.remaining_ms);
        }
        self.active = false;
    }

    /// Advance one scheduler period.  Returns the action on the tick the
    /// countdown expires, `None` otherwise.
    pub fn tick(&mut self) -> Option<A> {
        if !self.active {
            return None;
        }
        if self.remaining_ms > 0 {
            self.remaining_ms -= self.tick_ms;
        }
        if self.remaining_ms == 0 {
            self.active = false;
            return Some(self.action);
        }
        None
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Time left; only meaningful while active.
    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    pub fn tick_ms(&self) -> u32 {
        self.tick_ms
    }
}
