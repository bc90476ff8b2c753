//! Prop controller library.
//!
//! Cooperative control core for a winch / maglock / load-cell escape-room
//! prop: a fixed-period task scheduler, a tick-counted debouncer, a one-shot
//! countdown, and a GET-path command table, bound together by
//! [`app::service::PropService`].  Devices are reached only through the
//! port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod countdown;
pub mod debounce;
pub mod drivers;
pub mod error;
pub mod http;
pub mod scheduler;
pub mod trigger;
