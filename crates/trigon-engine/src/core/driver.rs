use std::f32::consts::PI;
use std::time::Duration;

use crate::coords::SurfaceSize;
use crate::device::{EglApi, EglConfigSpec, EglError, EglErrorAction, RenderContext};
use crate::input::TouchTracker;
use crate::lifecycle::{AppCommand, LifecycleEffect, LifecycleState};
use crate::render::{GlErrorLog, Renderer, SavedState, TriangleScene};
use crate::time::FrameClock;

use super::host::{CommandReply, EventSource, PollOutcome};

/// Frame driver configuration.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Config and context parameters requested from EGL.
    pub egl: EglConfigSpec,

    /// Radians the triangle turns per drawn frame.
    pub rotation_step: f32,

    /// GL errors logged before the driver stops printing them.
    pub max_gl_errors: u32,

    /// Clear color (rgba).
    pub clear_color: [f32; 4],
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            egl: EglConfigSpec::default(),
            rotation_step: PI / 100.0,
            max_gl_errors: 200,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Whether the game loop keeps running.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// What a single `do_frame` call ended up doing.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// Render context or GL objects unavailable; retried next iteration.
    NotReady,
    /// Surface size changed; viewport updated, nothing drawn.
    Resized(SurfaceSize),
    /// Frame drawn and presented.
    Drawn,
    /// EGL failed mid-frame; the error was routed through recovery.
    Lost(EglErrorAction),
}

/// Owns all engine state and runs the game loop.
///
/// Constructed explicitly by the platform entry point and driven through an
/// `EventSource`; nothing is global.
pub struct FrameDriver<E: EglApi, R: Renderer> {
    config: DriverConfig,

    render: RenderContext<E>,
    renderer: R,

    lifecycle: LifecycleState,
    touch: TouchTracker,
    scene: TriangleScene,

    /// Last surface size seen; compared against a live query every frame.
    surface_size: SurfaceSize,
    first_frame: bool,
    clock: FrameClock,
    gl_errors: GlErrorLog,
}

impl<E: EglApi, R: Renderer> FrameDriver<E, R> {
    pub fn new(egl: E, renderer: R, config: DriverConfig) -> Self {
        log::debug!("frame driver: initializing");
        Self {
            render: RenderContext::new(egl, config.egl.clone()),
            renderer,
            lifecycle: LifecycleState::new(),
            touch: TouchTracker::new(),
            scene: TriangleScene::new(config.rotation_step),
            surface_size: SurfaceSize::default(),
            first_frame: true,
            clock: FrameClock::new(),
            gl_errors: GlErrorLog::new(config.max_gl_errors),
            config,
        }
    }

    pub fn lifecycle(&self) -> &LifecycleState {
        &self.lifecycle
    }

    pub fn render_context(&self) -> &RenderContext<E> {
        &self.render
    }

    pub fn render_context_mut(&mut self) -> &mut RenderContext<E> {
        &mut self.render
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn touch(&self) -> &TouchTracker {
        &self.touch
    }

    pub fn scene(&self) -> &TriangleScene {
        &self.scene
    }

    pub fn surface_size(&self) -> SurfaceSize {
        self.surface_size
    }

    pub fn frames_presented(&self) -> u64 {
        self.clock.frames()
    }

    pub fn gl_errors(&self) -> &GlErrorLog {
        &self.gl_errors
    }

    /// Runs iterations until the host destroys the activity.
    pub fn run<H: EventSource>(&mut self, host: &mut H) {
        log::info!("game loop started");
        while self.run_iteration(host) == LoopControl::Continue {}
        log::info!("game loop finished after {} frame(s)", self.clock.frames());
    }

    /// One loop iteration: poll, dispatch, drain input, attempt a frame.
    ///
    /// Polling blocks while not animating so an idle activity sleeps until the
    /// host has something; while animating it never waits. A frame is then
    /// attempted regardless of the animating state.
    pub fn run_iteration<H: EventSource>(&mut self, host: &mut H) -> LoopControl {
        loop {
            let timeout = if self.lifecycle.is_animating() {
                Some(Duration::ZERO)
            } else {
                None
            };

            let outcome = host.poll(timeout, &mut |cmd| self.handle_command(cmd));

            if self.lifecycle.destroy_requested() {
                log::info!("host requested destroy, leaving loop");
                return LoopControl::Exit;
            }
            if outcome == PollOutcome::TimedOut {
                break;
            }
        }

        self.process_input(host);
        self.do_frame();
        LoopControl::Continue
    }

    /// Routes a host command through the lifecycle and applies its effect.
    pub fn handle_command(&mut self, command: AppCommand) -> CommandReply {
        let window_init = matches!(command, AppCommand::InitWindow { window_present: true });

        match self.lifecycle.apply(&command) {
            LifecycleEffect::None | LifecycleEffect::Terminate => {}
            LifecycleEffect::DestroySurface => self.render.destroy_surface(),
            LifecycleEffect::ReleaseGpuResources => {
                log::debug!("trimming memory footprint (deleting GL objects)");
                self.renderer.invalidate();
                self.render.destroy_context();
            }
            LifecycleEffect::SaveState => {
                return CommandReply::SavedState(self.scene.save().to_bytes());
            }
            LifecycleEffect::RestoreState(bytes) => match SavedState::from_bytes(&bytes) {
                Some(state) => {
                    log::debug!("restoring saved state (phase {:.3})", state.phase);
                    self.scene.restore(&state);
                }
                None => log::warn!("ignoring saved state of {} byte(s)", bytes.len()),
            },
        }

        if window_init {
            self.clock.reset();
        }
        CommandReply::Done
    }

    /// Normalizes every pending motion sample and feeds the scene.
    pub fn process_input<H: EventSource>(&mut self, host: &mut H) {
        let bounds = self.surface_size.bounds();
        let Self { touch, scene, .. } = self;

        host.drain_motion(&mut |sample| {
            touch.process(sample, bounds, |ev| scene.on_touch(ev));
        });
    }

    /// Builds or repairs the render context and GL objects.
    ///
    /// Idempotent; cheap when everything is already in place.
    pub fn prepare_to_render(&mut self) -> bool {
        if !self.render.is_complete() {
            let had_context = self.render.has_context();

            if let Err(e) = self.render.ensure_display() {
                log::error!("failed to create display: {e}");
                return false;
            }
            if let Err(e) = self.render.ensure_surface() {
                log::error!("failed to create surface: {e}");
                return false;
            }
            if let Err(e) = self.render.ensure_context() {
                log::error!("failed to create context: {e}");
                return false;
            }

            // Objects from a previous context died with it.
            if !had_context {
                self.renderer.invalidate();
            }
        }

        // Retried every frame until it sticks; some errors leave every handle
        // valid and have no teardown to force a rebuild.
        if !self.render.is_bound()
            && let Err(e) = self.render.make_current()
        {
            log::error!("eglMakeCurrent failed, EGL error {e}");
            self.render.handle_egl_error(Some(e));
            return false;
        }

        if !self.renderer.is_loaded() {
            log::debug!("creating OpenGL objects");
            if let Err(e) = self.renderer.load(self.config.clear_color) {
                log::error!("unable to initialize OpenGL objects: {e:#}");
                return false;
            }
        }

        true
    }

    /// Attempts one frame.
    ///
    /// A frame that detects a surface resize only updates the viewport; drawing
    /// resumes on the next call.
    pub fn do_frame(&mut self) -> FrameOutcome {
        if !self.prepare_to_render() {
            log::debug!("preparation to render failed");
            return FrameOutcome::NotReady;
        }

        // Queried every frame: some devices resize the surface without any
        // callback.
        let size = match self.render.query_surface_size() {
            Ok(size) => size,
            Err(e) => {
                log::warn!("eglQuerySurface failed, EGL error {e}");
                return self.lost(e);
            }
        };

        if size != self.surface_size {
            log::debug!(
                "surface changed size {}x{} --> {}x{}",
                self.surface_size.width,
                self.surface_size.height,
                size.width,
                size.height
            );
            self.surface_size = size;
            self.renderer.set_viewport(size);
            return FrameOutcome::Resized(size);
        }

        if self.first_frame {
            self.first_frame = false;
            log::info!("first frame at {}x{}", size.width, size.height);
        }

        let vertices = self.scene.advance();
        self.renderer.draw(vertices);

        let outcome = match self.render.swap_buffers() {
            Ok(()) => {
                let ft = self.clock.tick();
                if ft.frame_index % 50 == 0 {
                    log::trace!("render frame {} (dt {:.4}s)", ft.frame_index, ft.dt);
                }
                FrameOutcome::Drawn
            }
            Err(e) => {
                log::warn!("eglSwapBuffers failed, EGL error {e}");
                self.lost(e)
            }
        };

        while let Some(err) = self.renderer.next_error() {
            self.gl_errors.record(err);
        }

        outcome
    }

    fn lost(&mut self, error: EglError) -> FrameOutcome {
        let action = self.render.handle_egl_error(Some(error));
        if !action.is_handled() {
            log::error!("no recovery for EGL error {error}; frame dropped");
        }
        FrameOutcome::Lost(action)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use anyhow::{bail, Result};

    use super::*;
    use crate::device::fake::FakeEgl;
    use crate::input::{MotionAction, MotionSample, PointerSample};
    use crate::render::{GlError, Vertex};

    #[derive(Debug, Default)]
    struct FakeRenderer {
        loaded: bool,
        fail_load: bool,
        loads: u32,
        invalidations: u32,
        draws: u32,
        viewport: Option<SurfaceSize>,
        last_draw: Vec<Vertex>,
        pending_errors: VecDeque<GlError>,
    }

    impl Renderer for FakeRenderer {
        fn load(&mut self, _clear_color: [f32; 4]) -> Result<()> {
            self.loads += 1;
            if self.fail_load {
                bail!("vertex shader compilation failed");
            }
            self.loaded = true;
            Ok(())
        }

        fn is_loaded(&self) -> bool {
            self.loaded
        }

        fn invalidate(&mut self) {
            self.invalidations += 1;
            self.loaded = false;
        }

        fn set_viewport(&mut self, size: SurfaceSize) {
            self.viewport = Some(size);
        }

        fn draw(&mut self, vertices: &[Vertex]) {
            self.draws += 1;
            self.last_draw = vertices.to_vec();
        }

        fn next_error(&mut self) -> Option<GlError> {
            self.pending_errors.pop_front()
        }
    }

    /// Host replaying scripted command batches; one batch per poll.
    #[derive(Default)]
    struct ScriptedHost {
        batches: VecDeque<Vec<AppCommand>>,
        motion: VecDeque<MotionSample>,
        timeouts: Vec<Option<Duration>>,
        replies: Vec<CommandReply>,
    }

    impl ScriptedHost {
        fn with_batches(batches: Vec<Vec<AppCommand>>) -> Self {
            Self {
                batches: batches.into(),
                ..Default::default()
            }
        }
    }

    impl EventSource for ScriptedHost {
        fn poll(
            &mut self,
            timeout: Option<Duration>,
            handler: &mut dyn FnMut(AppCommand) -> CommandReply,
        ) -> PollOutcome {
            self.timeouts.push(timeout);
            // An exhausted script times out even when asked to block.
            let Some(batch) = self.batches.pop_front() else {
                return PollOutcome::TimedOut;
            };
            for cmd in batch {
                self.replies.push(handler(cmd));
            }
            PollOutcome::Dispatched
        }

        fn drain_motion(&mut self, handler: &mut dyn FnMut(&MotionSample)) {
            for sample in self.motion.drain(..) {
                handler(&sample);
            }
        }
    }

    type Driver = FrameDriver<FakeEgl, FakeRenderer>;

    fn driver() -> Driver {
        FrameDriver::new(FakeEgl::new(), FakeRenderer::default(), DriverConfig::default())
    }

    fn animating(d: &mut Driver) {
        d.handle_command(AppCommand::Start);
        d.handle_command(AppCommand::InitWindow { window_present: true });
        d.handle_command(AppCommand::GainedFocus);
    }

    /// Driver whose cached size already matches the surface.
    fn sized() -> Driver {
        let mut d = driver();
        animating(&mut d);
        assert!(matches!(d.do_frame(), FrameOutcome::Resized(_)));
        d
    }

    // ── frame ─────────────────────────────────────────────────────────────

    #[test]
    fn resize_frame_never_draws() {
        let mut d = driver();
        animating(&mut d);

        assert_eq!(d.do_frame(), FrameOutcome::Resized(SurfaceSize::new(1080, 1920)));
        assert_eq!(d.renderer().draws, 0);
        assert_eq!(d.renderer().viewport, Some(SurfaceSize::new(1080, 1920)));

        assert_eq!(d.do_frame(), FrameOutcome::Drawn);
        assert_eq!(d.renderer().draws, 1);

        d.render_context_mut().egl_mut().surface_size = SurfaceSize::new(1920, 1080);
        assert_eq!(d.do_frame(), FrameOutcome::Resized(SurfaceSize::new(1920, 1080)));
        assert_eq!(d.renderer().draws, 1);
        assert_eq!(d.surface_size(), SurfaceSize::new(1920, 1080));
    }

    #[test]
    fn drawn_frame_presents_and_rotates() {
        let mut d = sized();
        let before = d.scene().phase();

        assert_eq!(d.do_frame(), FrameOutcome::Drawn);
        assert_eq!(d.render_context().egl().swaps, 1);
        assert_eq!(d.frames_presented(), 1);
        assert!(d.scene().phase() > before);
        assert_eq!(d.renderer().last_draw.as_slice(), d.scene().vertices().as_slice());
    }

    #[test]
    fn missing_window_skips_frame_and_retries() {
        let mut d = driver();
        d.render_context_mut().egl_mut().window_present = false;

        assert_eq!(d.do_frame(), FrameOutcome::NotReady);
        assert_eq!(d.renderer().loads, 0);
        assert!(d.render_context().has_display());

        d.render_context_mut().egl_mut().window_present = true;
        assert!(matches!(d.do_frame(), FrameOutcome::Resized(_)));
        assert_eq!(d.renderer().loads, 1);
    }

    #[test]
    fn shader_failure_skips_frame() {
        let mut d = driver();
        d.renderer_mut().fail_load = true;

        assert_eq!(d.do_frame(), FrameOutcome::NotReady);
        assert_eq!(d.do_frame(), FrameOutcome::NotReady);
        assert_eq!(d.renderer().loads, 2);
        assert_eq!(d.renderer().draws, 0);

        d.renderer_mut().fail_load = false;
        assert!(matches!(d.do_frame(), FrameOutcome::Resized(_)));
    }

    #[test]
    fn make_current_failure_is_recovered() {
        let mut d = driver();
        d.render_context_mut().egl_mut().fail_make_current = Some(EglError::BadSurface);

        assert_eq!(d.do_frame(), FrameOutcome::NotReady);
        assert!(!d.render_context().has_surface());
        assert!(d.render_context().has_context());

        d.render_context_mut().egl_mut().fail_make_current = None;
        assert!(matches!(d.do_frame(), FrameOutcome::Resized(_)));
        assert_eq!(d.render_context().egl().surfaces_created, 2);
    }

    #[test]
    fn unrepaired_make_current_failure_is_retried() {
        let mut d = driver();
        d.render_context_mut().egl_mut().fail_make_current = Some(EglError::BadMatch);

        assert_eq!(d.do_frame(), FrameOutcome::NotReady);
        assert!(d.render_context().is_complete());
        assert!(!d.render_context().is_bound());
        assert_eq!(d.do_frame(), FrameOutcome::NotReady);
        assert_eq!(d.renderer().loads, 0);

        d.render_context_mut().egl_mut().fail_make_current = None;
        assert!(matches!(d.do_frame(), FrameOutcome::Resized(_)));
        assert_eq!(d.do_frame(), FrameOutcome::Drawn);
        assert_eq!(d.do_frame(), FrameOutcome::Drawn);

        assert!(d.render_context().egl().is_bound());
        assert!(d.render_context().is_bound());
        assert_eq!(d.renderer().draws, 2);
        assert_eq!(d.render_context().egl().contexts_created, 1);
    }

    #[test]
    fn term_window_forces_rebind() {
        let mut d = sized();
        d.handle_command(AppCommand::TermWindow);
        assert!(!d.render_context().is_bound());

        d.handle_command(AppCommand::InitWindow { window_present: true });
        assert_eq!(d.do_frame(), FrameOutcome::Drawn);
        assert!(d.render_context().egl().is_bound());
    }

    #[test]
    fn bad_surface_on_swap_rebuilds_surface_only() {
        let mut d = sized();
        d.render_context_mut().egl_mut().fail_swap = Some(EglError::BadSurface);

        assert_eq!(d.do_frame(), FrameOutcome::Lost(EglErrorAction::RecreateSurface));
        assert!(!d.render_context().has_surface());

        d.render_context_mut().egl_mut().fail_swap = None;
        assert_eq!(d.do_frame(), FrameOutcome::Drawn);
        assert_eq!(d.render_context().egl().surfaces_created, 2);
        assert_eq!(d.render_context().egl().contexts_created, 1);
        assert_eq!(d.renderer().loads, 1);
    }

    #[test]
    fn context_lost_on_swap_reloads_gl_objects() {
        let mut d = sized();
        d.render_context_mut().egl_mut().fail_swap = Some(EglError::ContextLost);

        assert_eq!(d.do_frame(), FrameOutcome::Lost(EglErrorAction::RecreateContext));

        d.render_context_mut().egl_mut().fail_swap = None;
        assert_eq!(d.do_frame(), FrameOutcome::Drawn);
        assert_eq!(d.render_context().egl().contexts_created, 2);
        assert_eq!(d.renderer().loads, 2);
    }

    #[test]
    fn unhandled_swap_error_keeps_running() {
        let mut d = sized();
        d.render_context_mut().egl_mut().fail_swap = Some(EglError::BadAlloc);

        assert_eq!(d.do_frame(), FrameOutcome::Lost(EglErrorAction::Unhandled));
        assert!(d.render_context().is_complete());
    }

    #[test]
    fn gl_errors_are_drained_and_limited() {
        let mut d = FrameDriver::new(
            FakeEgl::new(),
            FakeRenderer::default(),
            DriverConfig {
                max_gl_errors: 2,
                ..Default::default()
            },
        );
        animating(&mut d);
        d.do_frame();

        d.renderer_mut().pending_errors =
            vec![GlError::INVALID_ENUM, GlError::INVALID_VALUE, GlError::OUT_OF_MEMORY].into();
        d.do_frame();

        assert!(d.renderer().pending_errors.is_empty());
        assert_eq!(d.gl_errors().total(), 3);
        assert_eq!(d.gl_errors().printed(), 2);
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn term_window_destroys_surface() {
        let mut d = sized();
        d.handle_command(AppCommand::TermWindow);

        assert!(!d.render_context().has_surface());
        assert!(d.render_context().has_context());
        assert!(!d.lifecycle().is_animating());
    }

    #[test]
    fn low_memory_while_hidden_releases_gpu_objects() {
        let mut d = sized();
        d.handle_command(AppCommand::TermWindow);
        d.handle_command(AppCommand::LowMemory);

        assert!(!d.render_context().has_context());
        assert!(!d.renderer().is_loaded());

        d.handle_command(AppCommand::InitWindow { window_present: true });
        assert_eq!(d.do_frame(), FrameOutcome::Drawn);
        assert_eq!(d.renderer().loads, 2);
    }

    #[test]
    fn low_memory_on_screen_keeps_resources() {
        let mut d = sized();
        d.handle_command(AppCommand::LowMemory);

        assert!(d.render_context().is_complete());
        assert!(d.renderer().is_loaded());
    }

    #[test]
    fn save_and_restore_round_trip_through_host_commands() {
        let mut d = sized();
        d.do_frame();
        d.do_frame();
        let phase = d.scene().phase();

        let CommandReply::SavedState(bytes) = d.handle_command(AppCommand::SaveState) else {
            panic!("save state must return bytes");
        };

        let mut fresh = driver();
        fresh.handle_command(AppCommand::Resume { saved: Some(bytes) });
        assert_eq!(fresh.scene().phase(), phase);
    }

    // ── loop ──────────────────────────────────────────────────────────────

    #[test]
    fn polls_block_until_animating() {
        let mut d = driver();
        let mut host = ScriptedHost::with_batches(vec![
            vec![AppCommand::Start],
            vec![AppCommand::InitWindow { window_present: true }],
            vec![AppCommand::GainedFocus],
        ]);

        assert_eq!(d.run_iteration(&mut host), LoopControl::Continue);
        assert_eq!(host.timeouts, vec![None, None, None, Some(Duration::ZERO)]);
        // Surface sized on the first frame.
        assert_eq!(d.surface_size(), SurfaceSize::new(1080, 1920));
    }

    #[test]
    fn destroy_exits_before_drawing() {
        let mut d = sized();
        let mut host = ScriptedHost::with_batches(vec![vec![AppCommand::Destroy]]);

        d.run(&mut host);

        assert!(d.lifecycle().destroy_requested());
        assert_eq!(d.renderer().draws, 0);
        assert_eq!(host.timeouts.len(), 1);
    }

    #[test]
    fn iteration_renders_even_when_not_animating() {
        let mut d = driver();
        let mut host = ScriptedHost::default();

        d.run_iteration(&mut host);
        d.run_iteration(&mut host);

        assert!(!d.lifecycle().is_animating());
        assert_eq!(d.renderer().draws, 1);
    }

    #[test]
    fn save_state_reply_reaches_host() {
        let mut d = driver();
        let mut host = ScriptedHost::with_batches(vec![vec![AppCommand::SaveState]]);

        d.run_iteration(&mut host);

        assert!(matches!(host.replies.as_slice(), [CommandReply::SavedState(b)] if !b.is_empty()));
    }

    #[test]
    fn drag_moves_triangle() {
        let mut d = sized();
        let mut host = ScriptedHost::default();
        host.motion.extend([
            MotionSample::new(MotionAction::Down, vec![PointerSample::new(0, 540.0, 960.0)]),
            MotionSample::new(MotionAction::Move, vec![PointerSample::new(0, 648.0, 960.0)]),
            MotionSample::new(MotionAction::Up, vec![PointerSample::new(0, 648.0, 960.0)]),
        ]);

        d.process_input(&mut host);

        let origin = d.scene().origin();
        assert!((origin[0].x - 0.1).abs() < 1e-5);
        assert_eq!(origin[0].y, -0.5);
        assert!((origin[1].x + 0.4).abs() < 1e-5);
        assert_eq!(origin[1].y, 0.5);
        assert!(d.touch().is_empty());
    }
}
