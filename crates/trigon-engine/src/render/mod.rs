//! GLES rendering seam.
//!
//! The engine never issues GL calls itself. `Renderer` is implemented by the
//! platform crate; the engine owns the CPU-side triangle (`TriangleScene`) and
//! the GL error limiter.
//!
//! Convention:
//! - vertex positions are NDC, rotated on the CPU each frame
//! - the whole vertex array is re-uploaded every draw

mod errors;
mod renderer;
mod triangle;

pub use errors::{GlError, GlErrorLog};
pub use renderer::Renderer;
pub use triangle::{SavedState, TriangleScene, Vertex};
