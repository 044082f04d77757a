//! Frame timing.
//!
//! The runtime ticks one [`FrameClock`] per presented frame and hands the
//! resulting [`FrameTime`] to the app.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
