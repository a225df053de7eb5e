//! Weekly curfew schedule for curfewd
//!
//! This crate maps a timestamp to an allow/forbid decision:
//! - [`Period`]: one contiguous allowed time-of-day window
//! - [`DayProfile`]: the allowed windows for one kind of day
//! - [`Schedule`]: day-type classification plus profile lookup
//!
//! All schedule times are UTC, matching the clock source in `curfew-util`.

mod period;
mod profile;
mod schedule;

pub use period::*;
pub use profile::*;
pub use schedule::*;
