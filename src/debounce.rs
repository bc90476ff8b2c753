//! Tick-counted boolean debouncer with one-shot edge flags.
//!
//! A condition is accepted as stable only after `threshold` consecutive
//! identical samples.  Each confirmed change sets an edge flag that is
//! reported by exactly one `check_*_and_clear()` call.
//!
//! ## Time base
//!
//! `threshold` is a **tick count**, not a duration.  Whoever calls
//! [`Debouncer::tick`] must do so at a fixed cadence (in this crate, the
//! weight-trigger task period); the settle time is then
//! `threshold * period`.
//!
//! A reader that flips faster than `threshold` ticks never produces an edge.
//! That is the anti-chatter behaviour, not a bug.

#[derive(Debug, Clone)]
pub struct Debouncer {
    threshold: u16,
    /// Run length of `tracking` samples.
    counter: u16,
    /// Value currently being counted toward stability.
    tracking: bool,
    /// Last confirmed value.
    stable: bool,
    pending_high: bool,
    pending_low: bool,
}

impl Debouncer {
    /// Create a debouncer that starts stable-low.  A zero threshold is
    /// treated as one.
    pub fn new(threshold: u16) -> Self {
        Self {
            threshold: threshold.max(1),
            counter: 0,
            tracking: false,
            stable: false,
            pending_high: false,
            pending_low: false,
        }
    }

    /// Sample `reader` once and advance the state machine.
    pub fn tick(&mut self, reader: impl FnOnce() -> bool) {
        self.sample(reader());
    }

    /// Advance with a value the caller has already read.
    pub fn sample(&mut self, value: bool) {
        if value == self.tracking {
            self.counter = self.counter.saturating_add(1).min(self.threshold);
        } else {
            self.tracking = value;
            self.counter = 1;
        }

        if self.counter >= self.threshold && self.tracking != self.stable {
            self.stable = self.tracking;
            if self.stable {
                self.pending_high = true;
            } else {
                self.pending_low = true;
            }
        }
    }

    /// `true` once per confirmed low→high transition.
    pub fn check_high_and_clear(&mut self) -> bool {
        core::mem::take(&mut self.pending_high)
    }

    /// `true` once per confirmed high→low transition.
    pub fn check_low_and_clear(&mut self) -> bool {
        core::mem::take(&mut self.pending_low)
    }

    /// Last confirmed value.
    pub fn stable(&self) -> bool {
        self.stable
    }

    pub fn counter(&self) -> u16 {
        self.counter
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }
}
