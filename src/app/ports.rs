//! Port traits — the boundary between the control core and the devices.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PropService (domain)
//! ```
//!
//! Device adapters (relays, scale, push buttons, event sinks) implement
//! these traits.  The [`PropService`](super::service::PropService) takes
//! them as generic parameters per call, so the core never touches hardware
//! directly and never holds a device across calls.

// ───────────────────────────────────────────────────────────────
// Actuator port (domain → relays)
// ───────────────────────────────────────────────────────────────

/// Boolean-settable outputs on the prop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActuatorId {
    /// Winch relay 1 (pull up).
    WinchUp,
    /// Winch relay 2 (let down).
    WinchDown,
    /// Main maglock (`true` = engaged).
    Maglock,
    /// Lower-door maglock (`true` = engaged).
    LowerDoor,
}

/// Write-side port: the core sets and reads back opaque boolean outputs.
///
/// Setting an output to the value it already has must be harmless.
pub trait ActuatorPort {
    fn set(&mut self, id: ActuatorId, on: bool);
    fn get(&self, id: ActuatorId) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Scale port (load cell → domain)
// ───────────────────────────────────────────────────────────────

/// Load-cell scale.  Conversion and calibration live in the adapter.
pub trait ScalePort {
    /// Current scaled reading, or `None` if the scale is not ready.
    fn read(&mut self) -> Option<i32>;

    /// Zero the scale at its current load.  Returns `false` on failure.
    fn tare(&mut self) -> bool;

    /// Set the calibration factor from its text form.  Returns `false` if
    /// the text is not a usable factor.
    fn set_scale(&mut self, factor: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Input port (push buttons → domain)
// ───────────────────────────────────────────────────────────────

/// Edge-latched digital inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputId {
    /// "Capture current weight as target" push button.
    SetTarget,
}

pub trait InputPort {
    /// `true` exactly once per physical press (falling edge).
    fn check_low_and_clear(&mut self, id: InputId) -> bool;
}

/// Everything the service needs from the hardware in one bound.
pub trait PropHardware: ActuatorPort + ScalePort + InputPort {}

impl<T: ActuatorPort + ScalePort + InputPort> PropHardware for T {}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`PropEvent`](super::events::PropEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::PropEvent);
}
