use anyhow::Result;

use crate::coords::SurfaceSize;

use super::{GlError, Vertex};

/// GL-side half of the frame: shaders, buffers and draw calls.
///
/// All methods except `invalidate` and `is_loaded` require the render
/// context to be current on the calling thread.
pub trait Renderer {
    /// Configures global GL state, compiles shaders, links the program and
    /// sets up the vertex buffer. On error the renderer stays unloaded and the
    /// frame is skipped.
    fn load(&mut self, clear_color: [f32; 4]) -> Result<()>;

    fn is_loaded(&self) -> bool;

    /// Forgets every GL object without issuing GL calls. Used when the context
    /// that owned them is gone.
    fn invalidate(&mut self);

    fn set_viewport(&mut self, size: SurfaceSize);

    /// Clears the color buffer, uploads `vertices` and draws them as triangles.
    fn draw(&mut self, vertices: &[Vertex]);

    /// Pops the next pending GL error (`glGetError`).
    fn next_error(&mut self) -> Option<GlError>;
}
