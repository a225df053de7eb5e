//! Linux host integration for curfewd
//!
//! This crate provides:
//! - [`LinuxAdapterSet`]: the `AdapterSet` capability over rtnetlink,
//!   enumerating links once at startup and toggling `IFF_UP` on demand
//! - [`ReachabilityProbe`]: an HTTP check used to log whether a curfew
//!   transition actually took effect

mod adapter;
mod probe;

pub use adapter::*;
pub use probe::*;
