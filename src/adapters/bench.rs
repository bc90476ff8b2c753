//! Bench hardware adapter — simulated prop peripherals.
//!
//! Lets the controller run on a workstation with no relays, scale or
//! buttons attached.  Outputs are real [`Relay`] drivers over in-memory
//! pins, the push button is a real [`InputLatch`] over a pin the bench can
//! pull low, and the scale is a value the operator types in.

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use log::info;

use crate::app::ports::{ActuatorId, ActuatorPort, InputId, InputPort, ScalePort};
use crate::drivers::input_latch::InputLatch;
use crate::drivers::relay::Relay;

// ── Simulated pins ────────────────────────────────────────────

/// Output pin that just remembers its level.
#[derive(Debug, Default)]
pub struct SimOutputPin {
    high: bool,
}

impl SimOutputPin {
    pub fn is_set_high(&self) -> bool {
        self.high
    }
}

impl ErrorType for SimOutputPin {
    type Error = Infallible;
}

impl OutputPin for SimOutputPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high = true;
        Ok(())
    }
}

/// Input pin whose level is shared with the bench operator.
#[derive(Debug, Clone)]
pub struct SimInputPin {
    level: Rc<Cell<bool>>,
}

impl ErrorType for SimInputPin {
    type Error = Infallible;
}

impl InputPin for SimInputPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.level.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.level.get())
    }
}

// ── Simulated scale ───────────────────────────────────────────

/// Load cell stand-in: `(raw - offset) / factor`, rounded.
#[derive(Debug, Clone)]
pub struct SimScale {
    raw: Option<i32>,
    offset: i32,
    factor: f32,
}

impl SimScale {
    pub fn new() -> Self {
        Self {
            raw: Some(0),
            offset: 0,
            factor: 1.0,
        }
    }

    /// Set the raw load, or `None` to simulate an unresponsive scale.
    pub fn set_raw(&mut self, raw: Option<i32>) {
        self.raw = raw;
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }
}

impl Default for SimScale {
    fn default() -> Self {
        Self::new()
    }
}

impl ScalePort for SimScale {
    fn read(&mut self) -> Option<i32> {
        let raw = self.raw?;
        let scaled = (f64::from(raw) - f64::from(self.offset)) / f64::from(self.factor);
        Some(scaled.round() as i32)
    }

    fn tare(&mut self) -> bool {
        match self.raw {
            Some(raw) => {
                self.offset = raw;
                true
            }
            None => false,
        }
    }

    fn set_scale(&mut self, factor: &str) -> bool {
        match factor.trim().parse::<f32>() {
            Ok(f) if f.is_finite() && f != 0.0 => {
                self.factor = f;
                true
            }
            _ => false,
        }
    }
}

// ── BenchHardware ─────────────────────────────────────────────

/// Concrete adapter that combines all simulated peripherals behind the
/// port traits.
pub struct BenchHardware {
    winch_up: Relay<SimOutputPin>,
    winch_down: Relay<SimOutputPin>,
    maglock: Relay<SimOutputPin>,
    lower_door: Relay<SimOutputPin>,
    set_target: InputLatch<SimInputPin>,
    set_target_level: Rc<Cell<bool>>,
    /// Release the simulated button after the controller has sampled it.
    release_pending: bool,
    pub scale: SimScale,
}

impl BenchHardware {
    pub fn new() -> Self {
        let level = Rc::new(Cell::new(true));
        Self {
            winch_up: Relay::new(SimOutputPin::default(), "winch_up", false),
            winch_down: Relay::new(SimOutputPin::default(), "winch_down", false),
            maglock: Relay::new(SimOutputPin::default(), "maglock", false),
            lower_door: Relay::new(SimOutputPin::default(), "lower_door", false),
            set_target: InputLatch::new(SimInputPin {
                level: Rc::clone(&level),
            }),
            set_target_level: level,
            release_pending: false,
            scale: SimScale::new(),
        }
    }

    /// Momentary press of the set-target button.
    pub fn press_set_target(&mut self) {
        info!("Bench: set-target button pressed");
        self.set_target_level.set(false);
        self.release_pending = true;
    }

    /// One-line summary of every output.
    pub fn describe(&self) -> String {
        format!(
            "winch_up={} winch_down={} maglock={} lower_door={}",
            self.winch_up.get(),
            self.winch_down.get(),
            self.maglock.get(),
            self.lower_door.get()
        )
    }

    fn relay(&self, id: ActuatorId) -> &Relay<SimOutputPin> {
        match id {
            ActuatorId::WinchUp => &self.winch_up,
            ActuatorId::WinchDown => &self.winch_down,
            ActuatorId::Maglock => &self.maglock,
            ActuatorId::LowerDoor => &self.lower_door,
        }
    }

    fn relay_mut(&mut self, id: ActuatorId) -> &mut Relay<SimOutputPin> {
        match id {
            ActuatorId::WinchUp => &mut self.winch_up,
            ActuatorId::WinchDown => &mut self.winch_down,
            ActuatorId::Maglock => &mut self.maglock,
            ActuatorId::LowerDoor => &mut self.lower_door,
        }
    }
}

impl Default for BenchHardware {
    fn default() -> Self {
        Self::new()
    }
}

// ── Port implementations ──────────────────────────────────────

impl ActuatorPort for BenchHardware {
    fn set(&mut self, id: ActuatorId, on: bool) {
        self.relay_mut(id).set(on);
    }

    fn get(&self, id: ActuatorId) -> bool {
        self.relay(id).get()
    }
}

impl ScalePort for BenchHardware {
    fn read(&mut self) -> Option<i32> {
        self.scale.read()
    }

    fn tare(&mut self) -> bool {
        self.scale.tare()
    }

    fn set_scale(&mut self, factor: &str) -> bool {
        self.scale.set_scale(factor)
    }
}

impl InputPort for BenchHardware {
    fn check_low_and_clear(&mut self, id: InputId) -> bool {
        match id {
            InputId::SetTarget => {
                let pressed = self.set_target.check_low_and_clear();
                if self.release_pending {
                    self.set_target_level.set(true);
                    self.release_pending = false;
                }
                pressed
            }
        }
    }
}
