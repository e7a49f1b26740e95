use crate::coords::SurfaceSize;

use super::{EglApi, EglConfigSpec, EglError, EglErrorAction};

/// Owns the EGL display, config, window surface and GLES context.
///
/// Resources depend on each other in a strict order: display first, then
/// surface and context. Surface and context are never held without a display;
/// destroying the display destroys both of them first.
///
/// Every `ensure_*` call is idempotent, so the frame driver can call them each
/// frame to lazily rebuild whatever a lifecycle event or EGL error tore down.
pub struct RenderContext<E: EglApi> {
    egl: E,
    spec: EglConfigSpec,

    display: Option<E::Display>,
    config: Option<E::Config>,
    surface: Option<E::Surface>,
    context: Option<E::Context>,

    /// Surface and context are current on the calling thread.
    bound: bool,
}

impl<E: EglApi> RenderContext<E> {
    pub fn new(egl: E, spec: EglConfigSpec) -> Self {
        Self {
            egl,
            spec,
            display: None,
            config: None,
            surface: None,
            context: None,
            bound: false,
        }
    }

    pub fn egl(&self) -> &E {
        &self.egl
    }

    pub fn egl_mut(&mut self) -> &mut E {
        &mut self.egl
    }

    pub fn has_display(&self) -> bool {
        self.display.is_some()
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }

    /// True after a successful `make_current`, until the next unbind or teardown.
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// True when display, surface and context are all valid.
    pub fn is_complete(&self) -> bool {
        self.has_display() && self.has_surface() && self.has_context()
    }

    /// Acquires and initializes the default display unless one is held.
    pub fn ensure_display(&mut self) -> Result<(), EglError> {
        if self.display.is_some() {
            log::debug!("no need to init display (already had one)");
            return Ok(());
        }

        log::debug!("initializing display");
        let display = self.egl.default_display()?;
        self.egl.initialize(display).inspect_err(|e| {
            log::error!("failed to init display, error {e}");
        })?;

        self.display = Some(display);
        Ok(())
    }

    /// Creates the window surface unless one is held.
    ///
    /// # Panics
    ///
    /// Panics when called without a display.
    pub fn ensure_surface(&mut self) -> Result<(), EglError> {
        let display = self.display.expect("surface requires an initialized display");

        if self.surface.is_some() {
            log::debug!("no need to init surface (already had one)");
            return Ok(());
        }

        log::debug!("initializing surface");
        let config = self.choose_config(display)?;
        let surface = self
            .egl
            .create_window_surface(display, config)
            .inspect_err(|e| log::error!("failed to create EGL surface, EGL error {e}"))?;

        self.surface = Some(surface);
        log::debug!("successfully initialized surface");
        Ok(())
    }

    /// Creates the GLES context unless one is held.
    ///
    /// # Panics
    ///
    /// Panics when called without a display.
    pub fn ensure_context(&mut self) -> Result<(), EglError> {
        let display = self.display.expect("context requires an initialized display");

        if self.context.is_some() {
            log::debug!("no need to init context (already had one)");
            return Ok(());
        }

        log::debug!("initializing context");
        let config = match self.config {
            Some(config) => config,
            None => self.choose_config(display)?,
        };
        let context = self
            .egl
            .create_context(display, config, self.spec.client_version)
            .inspect_err(|e| log::error!("failed to create EGL context, EGL error {e}"))?;

        self.context = Some(context);
        log::debug!("successfully initialized context");
        Ok(())
    }

    /// Binds the surface and context to the calling thread.
    pub fn make_current(&mut self) -> Result<(), EglError> {
        let (Some(display), Some(surface), Some(context)) =
            (self.display, self.surface, self.context)
        else {
            return Err(EglError::BadCurrentSurface);
        };

        log::debug!(
            "binding surface and context (display {display:?}, surface {surface:?}, context {context:?})"
        );
        let res = self.egl.make_current(display, Some((surface, context)));
        self.bound = res.is_ok();
        res
    }

    /// Unbinds and destroys the surface.
    pub fn destroy_surface(&mut self) {
        log::debug!("killing surface");
        let Some(display) = self.display else {
            return;
        };

        self.unbind(display);
        if let Some(surface) = self.surface.take()
            && let Err(e) = self.egl.destroy_surface(display, surface)
        {
            log::warn!("eglDestroySurface failed: {e}");
        }
        log::debug!("surface killed successfully");
    }

    /// Unbinds and destroys the context.
    pub fn destroy_context(&mut self) {
        log::debug!("killing context");
        let Some(display) = self.display else {
            return;
        };

        self.unbind(display);
        if let Some(context) = self.context.take()
            && let Err(e) = self.egl.destroy_context(display, context)
        {
            log::warn!("eglDestroyContext failed: {e}");
        }
        log::debug!("context killed successfully");
    }

    /// Destroys context and surface, then terminates the display.
    pub fn destroy_display(&mut self) {
        log::debug!("killing display");
        self.destroy_context();
        self.destroy_surface();

        if let Some(display) = self.display.take() {
            log::debug!("terminating display now");
            if let Err(e) = self.egl.terminate(display) {
                log::warn!("eglTerminate failed: {e}");
            }
        }
        self.config = None;
        log::debug!("display killed successfully");
    }

    /// Tears down whatever `error` invalidated so the next frame rebuilds it.
    ///
    /// `None` stands for `EGL_SUCCESS`.
    pub fn handle_egl_error(&mut self, error: Option<EglError>) -> EglErrorAction {
        let Some(error) = error else {
            return EglErrorAction::Nothing;
        };

        match error {
            EglError::ContextLost | EglError::BadContext => {
                log::warn!("egl error: {error}. Recreating context.");
                self.destroy_context();
                EglErrorAction::RecreateContext
            }
            EglError::BadDisplay => {
                log::warn!("egl error: {error}. Recreating display.");
                self.destroy_display();
                EglErrorAction::RecreateDisplay
            }
            EglError::BadSurface => {
                log::warn!("egl error: {error}. Recreating surface.");
                self.destroy_surface();
                EglErrorAction::RecreateSurface
            }
            other => {
                log::warn!("unknown egl error: {other}");
                EglErrorAction::Unhandled
            }
        }
    }

    /// Live size of the window surface.
    pub fn query_surface_size(&mut self) -> Result<SurfaceSize, EglError> {
        let (Some(display), Some(surface)) = (self.display, self.surface) else {
            return Err(EglError::BadSurface);
        };
        self.egl.query_surface_size(display, surface)
    }

    /// Presents the back buffer.
    pub fn swap_buffers(&mut self) -> Result<(), EglError> {
        let (Some(display), Some(surface)) = (self.display, self.surface) else {
            return Err(EglError::BadSurface);
        };
        self.egl.swap_buffers(display, surface)
    }

    fn choose_config(&mut self, display: E::Display) -> Result<E::Config, EglError> {
        let config = self
            .egl
            .choose_config(display, &self.spec)?
            .ok_or(EglError::BadConfig)
            .inspect_err(|_| log::error!("no EGL config matches {:?}", self.spec))?;

        self.config = Some(config);
        Ok(config)
    }

    fn unbind(&mut self, display: E::Display) {
        self.bound = false;
        if let Err(e) = self.egl.make_current(display, None) {
            log::warn!("failed to unbind current context: {e}");
        }
    }
}

impl<E: EglApi> Drop for RenderContext<E> {
    fn drop(&mut self) {
        self.destroy_display();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::fake::FakeEgl;

    fn ready() -> RenderContext<FakeEgl> {
        let mut rc = RenderContext::new(FakeEgl::new(), EglConfigSpec::default());
        rc.ensure_display().unwrap();
        rc.ensure_surface().unwrap();
        rc.ensure_context().unwrap();
        rc
    }

    // ── ensure ────────────────────────────────────────────────────────────

    #[test]
    fn ensure_display_is_idempotent() {
        let mut rc = RenderContext::new(FakeEgl::new(), EglConfigSpec::default());
        rc.ensure_display().unwrap();
        rc.ensure_display().unwrap();

        assert!(rc.has_display());
        assert_eq!(rc.egl().initialize_calls, 1);
        assert_eq!(rc.egl().display_calls, 1);
    }

    #[test]
    fn failed_initialize_leaves_display_invalid() {
        let mut egl = FakeEgl::new();
        egl.fail_initialize = Some(EglError::NotInitialized);
        let mut rc = RenderContext::new(egl, EglConfigSpec::default());

        assert_eq!(rc.ensure_display(), Err(EglError::NotInitialized));
        assert!(!rc.has_display());

        rc.egl_mut().fail_initialize = None;
        rc.ensure_display().unwrap();
        assert!(rc.has_display());
    }

    #[test]
    fn ensure_surface_and_context_are_idempotent() {
        let mut rc = ready();
        rc.ensure_surface().unwrap();
        rc.ensure_context().unwrap();

        assert_eq!(rc.egl().surfaces_created, 1);
        assert_eq!(rc.egl().contexts_created, 1);
        assert_eq!(rc.egl().last_client_version, Some(3));
        assert!(rc.is_complete());
    }

    #[test]
    fn surface_uses_requested_config_spec() {
        let rc = ready();
        assert_eq!(rc.egl().last_spec, Some(EglConfigSpec::default()));
    }

    #[test]
    fn missing_config_is_reported() {
        let mut egl = FakeEgl::new();
        egl.no_matching_config = true;
        let mut rc = RenderContext::new(egl, EglConfigSpec::default());
        rc.ensure_display().unwrap();

        assert_eq!(rc.ensure_surface(), Err(EglError::BadConfig));
        assert!(!rc.has_surface());
    }

    #[test]
    fn missing_window_fails_surface_only() {
        let mut egl = FakeEgl::new();
        egl.window_present = false;
        let mut rc = RenderContext::new(egl, EglConfigSpec::default());
        rc.ensure_display().unwrap();

        assert_eq!(rc.ensure_surface(), Err(EglError::BadNativeWindow));
        rc.ensure_context().unwrap();
        assert!(rc.has_display() && rc.has_context() && !rc.has_surface());
    }

    #[test]
    #[should_panic(expected = "initialized display")]
    fn surface_without_display_panics() {
        let mut rc = RenderContext::new(FakeEgl::new(), EglConfigSpec::default());
        let _ = rc.ensure_surface();
    }

    #[test]
    #[should_panic(expected = "initialized display")]
    fn context_without_display_panics() {
        let mut rc = RenderContext::new(FakeEgl::new(), EglConfigSpec::default());
        let _ = rc.ensure_context();
    }

    #[test]
    fn make_current_requires_complete_context() {
        let mut rc = RenderContext::new(FakeEgl::new(), EglConfigSpec::default());
        rc.ensure_display().unwrap();
        assert_eq!(rc.make_current(), Err(EglError::BadCurrentSurface));

        let mut rc = ready();
        rc.make_current().unwrap();
        assert!(rc.egl().is_bound());
    }

    #[test]
    fn bound_tracks_make_current_and_teardown() {
        let mut rc = ready();
        assert!(!rc.is_bound());

        rc.egl_mut().fail_make_current = Some(EglError::BadMatch);
        assert_eq!(rc.make_current(), Err(EglError::BadMatch));
        assert!(!rc.is_bound());

        rc.egl_mut().fail_make_current = None;
        rc.make_current().unwrap();
        assert!(rc.is_bound());

        rc.destroy_context();
        assert!(!rc.is_bound());
    }

    // ── destroy ───────────────────────────────────────────────────────────

    #[test]
    fn destroy_surface_unbinds_first() {
        let mut rc = ready();
        rc.make_current().unwrap();

        rc.destroy_surface();

        assert!(!rc.egl().is_bound());
        assert!(!rc.has_surface());
        assert!(rc.has_context() && rc.has_display());
        assert_eq!(rc.egl().live_surfaces(), 0);
    }

    #[test]
    fn destroy_display_cascades() {
        let mut rc = ready();
        rc.destroy_display();

        assert!(!rc.has_display() && !rc.has_surface() && !rc.has_context());
        assert_eq!(rc.egl().live_surfaces(), 0);
        assert_eq!(rc.egl().live_contexts(), 0);
        assert_eq!(rc.egl().terminate_calls, 1);
    }

    #[test]
    fn destroy_twice_is_harmless() {
        let mut rc = ready();
        rc.destroy_display();
        rc.destroy_display();
        rc.destroy_surface();
        rc.destroy_context();

        assert_eq!(rc.egl().terminate_calls, 1);
    }

    #[test]
    fn drop_tears_everything_down() {
        let mut rc = ready();
        let probe = rc.egl_mut().probe();
        drop(rc);

        assert_eq!(probe.get(), 1);
    }

    // ── handle_egl_error ──────────────────────────────────────────────────

    #[test]
    fn success_is_noop() {
        let mut rc = ready();
        assert_eq!(rc.handle_egl_error(None), EglErrorAction::Nothing);
        assert!(rc.is_complete());
    }

    #[test]
    fn bad_display_invalidates_everything() {
        let mut rc = ready();
        let action = rc.handle_egl_error(Some(EglError::BadDisplay));

        assert_eq!(action, EglErrorAction::RecreateDisplay);
        assert!(!rc.has_display() && !rc.has_surface() && !rc.has_context());
    }

    #[test]
    fn bad_surface_keeps_display_and_context() {
        let mut rc = ready();
        let action = rc.handle_egl_error(Some(EglError::BadSurface));

        assert_eq!(action, EglErrorAction::RecreateSurface);
        assert!(rc.has_display() && rc.has_context());
        assert!(!rc.has_surface());
    }

    #[test]
    fn context_errors_destroy_context_only() {
        for err in [EglError::ContextLost, EglError::BadContext] {
            let mut rc = ready();
            assert_eq!(rc.handle_egl_error(Some(err)), EglErrorAction::RecreateContext);
            assert!(rc.has_display() && rc.has_surface());
            assert!(!rc.has_context());

            rc.ensure_context().unwrap();
            assert_eq!(rc.egl().contexts_created, 2);
        }
    }

    #[test]
    fn other_errors_are_unhandled() {
        let mut rc = ready();
        let action = rc.handle_egl_error(Some(EglError::BadAlloc));

        assert_eq!(action, EglErrorAction::Unhandled);
        assert!(!action.is_handled());
        assert!(rc.is_complete());
    }

    // ── queries ───────────────────────────────────────────────────────────

    #[test]
    fn queries_without_surface_report_bad_surface() {
        let mut rc = RenderContext::new(FakeEgl::new(), EglConfigSpec::default());
        assert_eq!(rc.query_surface_size(), Err(EglError::BadSurface));
        assert_eq!(rc.swap_buffers(), Err(EglError::BadSurface));
    }

    #[test]
    fn query_reports_live_size() {
        let mut rc = ready();
        rc.egl_mut().surface_size = SurfaceSize::new(720, 1280);
        assert_eq!(rc.query_surface_size(), Ok(SurfaceSize::new(720, 1280)));
    }
}
