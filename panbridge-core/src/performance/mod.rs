//! Performance history
//!
//! [`PerformanceAccumulator`] polls `sysstat storage` and `sysstat director`
//! on a timer and keeps the last [`MAX_HISTORY`] samples of each in a
//! [`RollingWindow`].

pub mod accumulator;
pub mod window;

pub use accumulator::{DEFAULT_POLL_INTERVAL, PerformanceAccumulator, PollOutcome};
pub use window::{MAX_HISTORY, RollingWindow, Timestamped};
