use std::fmt::Debug;

use crate::coords::SurfaceSize;

use super::{EglConfigSpec, EglError};

/// Platform EGL entry points used by `RenderContext`.
///
/// Implementations wrap the real EGL library (and own the native window the
/// surface binds to); tests substitute a recording fake. Every call that can
/// fail reports the EGL error that `eglGetError` would return.
pub trait EglApi {
    type Display: Copy + Debug;
    type Config: Copy + Debug;
    type Surface: Copy + Debug;
    type Context: Copy + Debug;

    /// `eglGetDisplay(EGL_DEFAULT_DISPLAY)`.
    fn default_display(&mut self) -> Result<Self::Display, EglError>;

    /// `eglInitialize`.
    fn initialize(&mut self, display: Self::Display) -> Result<(), EglError>;

    /// First config satisfying `spec` for window surfaces, if any.
    fn choose_config(
        &mut self,
        display: Self::Display,
        spec: &EglConfigSpec,
    ) -> Result<Option<Self::Config>, EglError>;

    /// Creates a surface bound to the host's current native window.
    fn create_window_surface(
        &mut self,
        display: Self::Display,
        config: Self::Config,
    ) -> Result<Self::Surface, EglError>;

    fn create_context(
        &mut self,
        display: Self::Display,
        config: Self::Config,
        client_version: i32,
    ) -> Result<Self::Context, EglError>;

    /// Binds `target` as draw/read surface and context, or unbinds everything
    /// when `target` is `None`.
    fn make_current(
        &mut self,
        display: Self::Display,
        target: Option<(Self::Surface, Self::Context)>,
    ) -> Result<(), EglError>;

    fn destroy_surface(
        &mut self,
        display: Self::Display,
        surface: Self::Surface,
    ) -> Result<(), EglError>;

    fn destroy_context(
        &mut self,
        display: Self::Display,
        context: Self::Context,
    ) -> Result<(), EglError>;

    /// `eglTerminate`.
    fn terminate(&mut self, display: Self::Display) -> Result<(), EglError>;

    /// Live `EGL_WIDTH` / `EGL_HEIGHT` of `surface`.
    fn query_surface_size(
        &mut self,
        display: Self::Display,
        surface: Self::Surface,
    ) -> Result<SurfaceSize, EglError>;

    fn swap_buffers(
        &mut self,
        display: Self::Display,
        surface: Self::Surface,
    ) -> Result<(), EglError>;
}
