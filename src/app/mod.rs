//! Application core — prop behaviour, zero I/O.
//!
//! The business rules for the prop live here: which outputs each command
//! drives, what the weight trigger does on each edge, and when the lower
//! door re-locks.  All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable without
//! real peripherals.

pub mod events;
pub mod ports;
pub mod service;
