//! Coordinate types shared by input normalization and rendering.
//!
//! Touch space:
//! - Raw positions are surface pixels, origin top-left, +Y down
//! - Normalized positions divide by the surface extent, landing in [0, 1]

mod bounds;
mod vec2;

pub use bounds::{Bounds, SurfaceSize};
pub use vec2::Vec2;
