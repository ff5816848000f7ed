//! Platform abstraction layer
//!
//! Handles the pieces every frontend needs regardless of host:
//! - Turning wall-clock time into whole simulation ticks
//! - Locating the frontend's mount point with a bounded retry

pub mod clock;
pub mod mount;

pub use clock::{FixedStep, IntervalScheduler};
pub use mount::MountRetry;
