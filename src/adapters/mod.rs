//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter     | Implements                          | Connects to            |
//! |-------------|-------------------------------------|------------------------|
//! | `bench`     | ActuatorPort, ScalePort, InputPort  | simulated pins + scale |
//! | `log_sink`  | EventSink                           | `log` output           |
//! | `time`      | —                                   | host monotonic clock   |

pub mod bench;
pub mod log_sink;
pub mod time;
