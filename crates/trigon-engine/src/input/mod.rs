//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose android-activity types.
//! The host adapter translates platform motion events into `MotionSample`s;
//! `TouchTracker` turns those into per-finger `TouchEvent`s.

mod tracker;
mod types;

pub use tracker::TouchTracker;
pub use types::{MotionAction, MotionSample, PointerSample, TouchEvent, TouchPhase};
