//! Scanning engine of `netsweep`.
//!
//! Leaf operations ([`probe`], [`port_check`]) each handle one address or one
//! port. [`sweep`] and [`port_scan`] fan them out concurrently with an explicit
//! join barrier, and [`orchestrator`] chains the two phases.

pub mod network;
pub mod orchestrator;
pub mod port_check;
pub mod port_scan;
pub mod probe;
pub mod sweep;
