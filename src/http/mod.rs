//! GET-style command surface.
//!
//! The transport (TCP, HTTP framing, sockets) lives outside this crate.  It
//! hands the controller a raw request line and sends back whatever
//! [`Response`] comes out, or closes the connection when nothing does.
//!
//! ```text
//!  request line ──▶ request_path ──▶ dispatch(ROUTES) ──▶ Command ──▶ PropService
//!                                          │
//!                                       NoMatch ──▶ (no response)
//! ```

pub mod dispatch;
pub mod response;

pub use dispatch::{Command, Dispatch, ROUTES, Route, dispatch, request_path};
pub use response::{Response, ResponseBuilder};
