//! Shared building blocks for `netsweep`.
//!
//! * [`network`]: address ranges, scan targets, host and port results.
//! * [`ports`]: ordered port lists and the well-known defaults.
//! * [`config`]: scan parameters and presentation switches.
//! * [`error`]: the error type shared by every library crate.

pub mod config;
pub mod error;
pub mod log;
pub mod network;
pub mod ports;
pub mod utils;

#[doc(hidden)]
pub use tracing;
