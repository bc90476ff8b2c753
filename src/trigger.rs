//! Weight-window trigger.
//!
//! Debounces "the scale reading lies inside `[target - window, target +
//! window]`" and turns the resulting edges into a two-state machine:
//!
//! ```text
//!              high edge
//!  Untriggered ─────────▶ Triggered
//!              ◀─────────
//!               low edge
//! ```
//!
//! The window test is recomputed every tick from the parameters passed in,
//! so changing the target or window at runtime takes effect on the next
//! sample without resetting the debouncer.

use crate::debounce::Debouncer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Untriggered,
    Triggered,
}

/// A state change produced by [`WeightTrigger::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEdge {
    /// Reading settled inside the window.
    Entered,
    /// Reading settled outside the window.
    Left,
}

/// Closed-interval window test in signed 64-bit arithmetic, so neither a
/// negative reading nor a window wider than the target wraps.
pub fn in_window(reading: i32, target: i32, window: u32) -> bool {
    let reading = i64::from(reading);
    let target = i64::from(target);
    let window = i64::from(window);
    (target - window..=target + window).contains(&reading)
}

#[derive(Debug, Clone)]
pub struct WeightTrigger {
    debouncer: Debouncer,
    state: TriggerState,
}

impl WeightTrigger {
    pub fn new(threshold: u16) -> Self {
        Self {
            debouncer: Debouncer::new(threshold),
            state: TriggerState::Untriggered,
        }
    }

    /// Sample one reading.  A failed scale read (`None`) counts as outside
    /// the window.
    pub fn tick(&mut self, reading: Option<i32>, target: i32, window: u32) -> Option<TriggerEdge> {
        self.debouncer
            .tick(|| reading.is_some_and(|r| in_window(r, target, window)));

        if self.debouncer.check_high_and_clear() {
            self.state = TriggerState::Triggered;
            return Some(TriggerEdge::Entered);
        }
        if self.debouncer.check_low_and_clear() {
            self.state = TriggerState::Untriggered;
            return Some(TriggerEdge::Left);
        }
        None
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }
}
