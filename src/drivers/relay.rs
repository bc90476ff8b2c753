//! Relay / maglock output driver.
//!
//! A dumb boolean output over any `embedded-hal` [`OutputPin`].  Winch
//! relays and maglocks are both just "on or off" to the controller.
//!
//! ## Contract
//!
//! - `set(v)` with the current value is a no-op (no pin write).
//! - A failed pin write is logged and the cached state is left unchanged,
//!   so [`Relay::get`] always reflects the last value that reached the pin.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::error::DeviceError;

pub struct Relay<P> {
    pin: P,
    name: &'static str,
    /// Board wiring: `true` when the relay closes on a low pin.
    active_low: bool,
    on: bool,
}

impl<P: OutputPin> Relay<P> {
    /// Wrap `pin` and drive it to the off level.
    pub fn new(pin: P, name: &'static str, active_low: bool) -> Self {
        let mut relay = Self {
            pin,
            name,
            active_low,
            on: true,
        };
        if let Err(e) = relay.write(false) {
            warn!("Relay {}: initial off failed: {}", name, e);
        }
        relay.on = false;
        relay
    }

    pub fn set(&mut self, on: bool) {
        if on == self.on {
            return;
        }
        match self.write(on) {
            Ok(()) => self.on = on,
            Err(e) => warn!("Relay {}: {} (state kept {})", self.name, e, self.on),
        }
    }

    pub fn get(&self) -> bool {
        self.on
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn write(&mut self, on: bool) -> Result<(), DeviceError> {
        let high = on != self.active_low;
        let res = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        res.map_err(|_| DeviceError::PinWrite)
    }
}
