//! Error types for the prop controller.
//!
//! The control core itself never fails: sensor dropouts, bad arguments and
//! unknown requests all degrade to a safe default.  The types here cover the
//! two places where something can be reported: configuration validation and
//! pin-level device writes.  Both are `Copy` so they can be logged and passed
//! around without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// A [`PropConfig`](crate::config::PropConfig) field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The scheduler tick period must be non-zero.
    ZeroTickPeriod,
    /// The debounce threshold must be at least one sample.
    ZeroThreshold,
    /// The debug report period is shorter than one scheduler tick.
    DebugPeriodTooShort,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroTickPeriod => write!(f, "tick_period_ms must be > 0"),
            Self::ZeroThreshold => write!(f, "debounce_threshold must be > 0"),
            Self::DebugPeriodTooShort => {
                write!(f, "debug_period_ms must be 0 or >= tick_period_ms")
            }
        }
    }
}

impl core::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Device errors
// ---------------------------------------------------------------------------

/// A GPIO-level operation failed inside a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// Writing an output pin failed.
    PinWrite,
    /// Reading an input pin failed.
    PinRead,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PinWrite => write!(f, "GPIO write failed"),
            Self::PinRead => write!(f, "GPIO read failed"),
        }
    }
}

impl core::error::Error for DeviceError {}
