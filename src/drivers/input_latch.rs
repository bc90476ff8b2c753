//! Falling-edge input latch.
//!
//! Push buttons on the prop are active-low with a pull-up.  [`InputLatch`]
//! samples the pin on every [`poll`](InputLatch::poll) and latches each
//! high→low transition until [`check_low_and_clear`](InputLatch::check_low_and_clear)
//! consumes it, so one physical press is reported exactly once no matter
//! how long it is held.
//!
//! Contact bounce is left to the hardware RC filter.

use embedded_hal::digital::InputPin;
use log::warn;

pub struct InputLatch<P> {
    pin: P,
    last_high: bool,
    low_pending: bool,
}

impl<P: InputPin> InputLatch<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            last_high: true,
            low_pending: false,
        }
    }

    /// Sample the pin and latch a falling edge.  A read error counts as
    /// "no change".
    pub fn poll(&mut self) {
        let high = match self.pin.is_high() {
            Ok(h) => h,
            Err(_) => {
                warn!("InputLatch: {}", crate::error::DeviceError::PinRead);
                return;
            }
        };
        if self.last_high && !high {
            self.low_pending = true;
        }
        self.last_high = high;
    }

    /// Poll once more, then report and clear the latched edge.
    pub fn check_low_and_clear(&mut self) -> bool {
        self.poll();
        core::mem::take(&mut self.low_pending)
    }
}
