//! Core loop contracts.
//!
//! `EventSource` is the seam between the activity host and the engine;
//! `FrameDriver` owns every piece of engine state and runs the per-iteration
//! protocol: poll, dispatch lifecycle commands, drain touches, draw one frame.

mod driver;
mod host;

pub use driver::{DriverConfig, FrameDriver, FrameOutcome, LoopControl};
pub use host::{CommandReply, EventSource, PollOutcome};
