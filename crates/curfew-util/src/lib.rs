//! Shared utilities for curfewd
//!
//! This crate provides:
//! - Time-of-day and timestamp types used by schedule evaluation
//! - The UTC time source (with a debug-only mock override)

mod time;

pub use time::*;
