//! Outbound prop events.
//!
//! The [`PropService`](super::service::PropService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them — log to serial, forward to a game master
//! console, etc.

use crate::config::Action;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropEvent {
    /// The service registered its tasks and is running.
    Started,

    /// The weight settled inside the window and `action` ran.
    Triggered { reading: Option<i32>, action: Action },

    /// The weight settled outside the window; `action` ran if configured.
    Released { action: Option<Action> },

    /// A trigger edge arrived while the manual override was engaged.
    TriggerSuppressed,

    /// A countdown expired and ran its action.
    TimeoutFired(Action),

    /// The target weight was replaced by the current reading.
    TargetUpdated { target: i32 },

    /// The game-complete flag latched.
    GameCompleted,
}
