//! Pin-level output and input wrappers over `embedded-hal` traits.

pub mod input_latch;
pub mod relay;
