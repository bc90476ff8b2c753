//! Prop configuration parameters
//!
//! All tunable parameters for the prop controller.  Values come from the
//! built-in defaults or a JSON file handed to the bench runner; nothing is
//! persisted by the controller itself.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// An actuator action that can be bound to a weight-trigger edge or a
/// countdown completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Winch up.
    Raise,
    /// Winch down.
    Lower,
    /// Both winch relays off.
    Stop,
    /// Release the main maglock (engages manual override).
    Open,
    /// Engage the main maglock (clears manual override).
    Close,
    /// Release the lower-door maglock.
    LowerDoorOpen,
    /// Engage the lower-door maglock.
    LowerDoorClose,
}

/// What the weight trigger does on each debounced edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Action run when the reading settles inside the target window.
    pub on_high: Action,
    /// Action run when the reading settles outside the window again.
    pub on_low: Option<Action>,
    /// Latch the game-complete flag on the high edge.
    pub completes_game: bool,
}

/// Core prop configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropConfig {
    // --- Timing ---
    /// Period of the weight-trigger and timeout tasks (milliseconds).
    /// Also the countdown decrement step.
    pub tick_period_ms: u32,
    /// Period of the debug status report (milliseconds, 0 = disabled).
    pub debug_period_ms: u32,

    // --- Weight trigger ---
    /// Consecutive in-window (or out-of-window) samples needed for an edge.
    /// Counted in weight-trigger ticks, so the settle time is
    /// `debounce_threshold * tick_period_ms`.
    pub debounce_threshold: u16,
    /// Target weight in scale units.
    pub target_weight: i32,
    /// Half-width of the accepted window around the target.
    pub weight_window: u32,
    /// Edge actions.
    pub trigger: TriggerConfig,
}

impl Default for PropConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 100, // 10 Hz
            debug_period_ms: 1000,

            debounce_threshold: 10, // 1 s settle at 10 Hz
            target_weight: 1000,
            weight_window: 50,
            trigger: TriggerConfig {
                on_high: Action::Raise,
                on_low: Some(Action::Lower),
                completes_game: false,
            },
        }
    }
}

impl PropConfig {
    /// Preset for the maglock door variant: the correct weight releases the
    /// main lock and completes the game; removing it again does nothing.
    pub fn door() -> Self {
        Self {
            trigger: TriggerConfig {
                on_high: Action::Open,
                on_low: None,
                completes_game: true,
            },
            ..Self::default()
        }
    }

    /// Range-check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if self.debounce_threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if self.debug_period_ms != 0 && self.debug_period_ms < self.tick_period_ms {
            return Err(ConfigError::DebugPeriodTooShort);
        }
        Ok(())
    }
}
