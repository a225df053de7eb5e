//! Host adapter interface for curfewd
//!
//! The curfew engine never talks to the operating system directly. It sees
//! the network through the [`AdapterSet`] capability: a fixed list of
//! adapter handles plus per-adapter enable/disable operations, each
//! independently fallible. Platform crates implement the trait;
//! [`MockAdapterSet`] implements it for tests.

mod handle;
mod mock;
mod traits;

pub use handle::*;
pub use mock::*;
pub use traits::*;
