//! Client for the OBS WebSocket v5 remote control endpoint.
//!
//! Public API
//! - [`Client`]: owns at most one identified connection and implements
//!   [`ops::SourceOps`], the capability trait the reconciler is written
//!   against.
//! - [`Connection`]: a single identified WebSocket session with strictly
//!   sequential request/response pairs.
//! - [`ops::MockSourceOps`]: a recording fake, available under the
//!   `test-utils` feature.
//!
//! Connection lifecycle
//! - `connect` makes exactly one attempt (socket, identify handshake, then a
//!   `GetVersion` probe). Retry policy belongs to the caller.
//! - Transport failures, timeouts, and server-side closes drop the connection;
//!   request failures reported by the server (`requestStatus.result == false`)
//!   do not.
#![warn(missing_docs)]

mod client;
mod connection;
mod error;
pub mod ops;

pub use client::Client;
pub use connection::{ConnectOptions, Connection};
pub use error::{Error, Result};
pub use obs_protocol::VersionInfo;
