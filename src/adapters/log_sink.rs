//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each prop event as one log line.
//! A game-master console adapter would implement the same trait.

use log::info;

use crate::app::events::PropEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`PropEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &PropEvent) {
        match event {
            PropEvent::Started => info!("START | prop controller running"),
            PropEvent::Triggered { reading, action } => {
                info!("TRIGGER | reading={:?} -> {:?}", reading, action);
            }
            PropEvent::Released { action } => {
                info!("RELEASE | action={:?}", action);
            }
            PropEvent::TriggerSuppressed => info!("TRIGGER | suppressed (override)"),
            PropEvent::TimeoutFired(action) => info!("TIMEOUT | {:?}", action),
            PropEvent::TargetUpdated { target } => info!("TARGET | {}", target),
            PropEvent::GameCompleted => info!("GAME | complete"),
        }
    }
}
