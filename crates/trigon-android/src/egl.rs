use android_activity::AndroidApp;
use khronos_egl as egl;
use ndk::native_window::NativeWindow;

use trigon_engine::coords::SurfaceSize;
use trigon_engine::device::{EglApi, EglConfigSpec, EglError};

/// `EGL_OPENGL_ES3_BIT` (EGL 1.5 / `EGL_KHR_create_context`).
const OPENGL_ES3_BIT: egl::Int = 0x0040;

/// `EglApi` over the system `libEGL`.
///
/// Holds a reference to the native window for as long as a surface is bound
/// to it.
pub struct AndroidEgl {
    egl: egl::Instance<egl::Static>,
    app: AndroidApp,
    window: Option<NativeWindow>,
}

impl AndroidEgl {
    pub fn new(app: AndroidApp) -> Self {
        Self {
            egl: egl::Instance::new(egl::Static),
            app,
            window: None,
        }
    }
}

impl EglApi for AndroidEgl {
    type Display = egl::Display;
    type Config = egl::Config;
    type Surface = egl::Surface;
    type Context = egl::Context;

    fn default_display(&mut self) -> Result<egl::Display, EglError> {
        // SAFETY: EGL_DEFAULT_DISPLAY is always a valid display id.
        unsafe { self.egl.get_display(egl::DEFAULT_DISPLAY) }.ok_or(EglError::BadDisplay)
    }

    fn initialize(&mut self, display: egl::Display) -> Result<(), EglError> {
        let (major, minor) = self.egl.initialize(display).map_err(from_egl)?;
        log::info!("EGL {major}.{minor} initialized");
        Ok(())
    }

    fn choose_config(
        &mut self,
        display: egl::Display,
        spec: &EglConfigSpec,
    ) -> Result<Option<egl::Config>, EglError> {
        self.egl
            .choose_first_config(display, &config_attribs(spec))
            .map_err(from_egl)
    }

    fn create_window_surface(
        &mut self,
        display: egl::Display,
        config: egl::Config,
    ) -> Result<egl::Surface, EglError> {
        let window = self.app.native_window().ok_or(EglError::BadNativeWindow)?;

        // SAFETY: `window` is a live ANativeWindow; we keep our reference to it
        // until the surface is destroyed.
        let surface = unsafe {
            self.egl.create_window_surface(
                display,
                config,
                window.ptr().as_ptr() as egl::NativeWindowType,
                None,
            )
        }
        .map_err(from_egl)?;

        self.window = Some(window);
        Ok(surface)
    }

    fn create_context(
        &mut self,
        display: egl::Display,
        config: egl::Config,
        client_version: i32,
    ) -> Result<egl::Context, EglError> {
        let attribs = [egl::CONTEXT_CLIENT_VERSION, client_version, egl::NONE];
        self.egl
            .create_context(display, config, None, &attribs)
            .map_err(from_egl)
    }

    fn make_current(
        &mut self,
        display: egl::Display,
        target: Option<(egl::Surface, egl::Context)>,
    ) -> Result<(), EglError> {
        let (surface, context) = match target {
            Some((s, c)) => (Some(s), Some(c)),
            None => (None, None),
        };
        self.egl
            .make_current(display, surface, surface, context)
            .map_err(from_egl)
    }

    fn destroy_surface(&mut self, display: egl::Display, surface: egl::Surface) -> Result<(), EglError> {
        let res = self.egl.destroy_surface(display, surface).map_err(from_egl);
        self.window = None;
        res
    }

    fn destroy_context(&mut self, display: egl::Display, context: egl::Context) -> Result<(), EglError> {
        self.egl.destroy_context(display, context).map_err(from_egl)
    }

    fn terminate(&mut self, display: egl::Display) -> Result<(), EglError> {
        self.egl.terminate(display).map_err(from_egl)
    }

    fn query_surface_size(
        &mut self,
        display: egl::Display,
        surface: egl::Surface,
    ) -> Result<SurfaceSize, EglError> {
        let width = self.egl.query_surface(display, surface, egl::WIDTH).map_err(from_egl)?;
        let height = self.egl.query_surface(display, surface, egl::HEIGHT).map_err(from_egl)?;
        Ok(SurfaceSize::new(width, height))
    }

    fn swap_buffers(&mut self, display: egl::Display, surface: egl::Surface) -> Result<(), EglError> {
        self.egl.swap_buffers(display, surface).map_err(from_egl)
    }
}

/// Attribute list for `eglChooseConfig`.
fn config_attribs(spec: &EglConfigSpec) -> [egl::Int; 13] {
    let renderable = if spec.client_version >= 3 {
        OPENGL_ES3_BIT
    } else {
        egl::OPENGL_ES2_BIT
    };

    [
        egl::RENDERABLE_TYPE,
        renderable,
        egl::SURFACE_TYPE,
        egl::WINDOW_BIT,
        egl::BLUE_SIZE,
        spec.blue_size,
        egl::GREEN_SIZE,
        spec.green_size,
        egl::RED_SIZE,
        spec.red_size,
        egl::DEPTH_SIZE,
        spec.depth_size,
        egl::NONE,
    ]
}

fn from_egl(err: egl::Error) -> EglError {
    match err {
        egl::Error::NotInitialized => EglError::NotInitialized,
        egl::Error::BadAccess => EglError::BadAccess,
        egl::Error::BadAlloc => EglError::BadAlloc,
        egl::Error::BadAttribute => EglError::BadAttribute,
        egl::Error::BadContext => EglError::BadContext,
        egl::Error::BadConfig => EglError::BadConfig,
        egl::Error::BadCurrentSurface => EglError::BadCurrentSurface,
        egl::Error::BadDisplay => EglError::BadDisplay,
        egl::Error::BadSurface => EglError::BadSurface,
        egl::Error::BadMatch => EglError::BadMatch,
        egl::Error::BadParameter => EglError::BadParameter,
        egl::Error::BadNativePixmap => EglError::BadNativePixmap,
        egl::Error::BadNativeWindow => EglError::BadNativeWindow,
        egl::Error::ContextLost => EglError::ContextLost,
    }
}
