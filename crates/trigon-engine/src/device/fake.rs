//! Recording EGL stand-in for unit tests.

use std::cell::Cell;
use std::rc::Rc;

use crate::coords::SurfaceSize;

use super::{EglApi, EglConfigSpec, EglError};

#[derive(Debug)]
pub(crate) struct FakeEgl {
    pub display_calls: u32,
    pub initialize_calls: u32,
    pub terminate_calls: u32,
    pub surfaces_created: u32,
    pub surfaces_destroyed: u32,
    pub contexts_created: u32,
    pub contexts_destroyed: u32,
    pub swaps: u32,

    pub last_spec: Option<EglConfigSpec>,
    pub last_client_version: Option<i32>,
    pub current: Option<(u32, u32)>,

    pub window_present: bool,
    pub no_matching_config: bool,
    pub fail_initialize: Option<EglError>,
    pub fail_make_current: Option<EglError>,
    pub fail_swap: Option<EglError>,
    pub surface_size: SurfaceSize,

    terminated: Rc<Cell<u32>>,
    next_handle: u32,
}

impl FakeEgl {
    pub fn new() -> Self {
        Self {
            display_calls: 0,
            initialize_calls: 0,
            terminate_calls: 0,
            surfaces_created: 0,
            surfaces_destroyed: 0,
            contexts_created: 0,
            contexts_destroyed: 0,
            swaps: 0,
            last_spec: None,
            last_client_version: None,
            current: None,
            window_present: true,
            no_matching_config: false,
            fail_initialize: None,
            fail_make_current: None,
            fail_swap: None,
            surface_size: SurfaceSize::new(1080, 1920),
            terminated: Rc::new(Cell::new(0)),
            next_handle: 1,
        }
    }

    /// Shared terminate counter that outlives the fake.
    pub fn probe(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.terminated)
    }

    pub fn is_bound(&self) -> bool {
        self.current.is_some()
    }

    pub fn live_surfaces(&self) -> u32 {
        self.surfaces_created - self.surfaces_destroyed
    }

    pub fn live_contexts(&self) -> u32 {
        self.contexts_created - self.contexts_destroyed
    }

    fn handle(&mut self) -> u32 {
        let h = self.next_handle;
        self.next_handle += 1;
        h
    }
}

impl EglApi for FakeEgl {
    type Display = u32;
    type Config = u32;
    type Surface = u32;
    type Context = u32;

    fn default_display(&mut self) -> Result<u32, EglError> {
        self.display_calls += 1;
        Ok(self.handle())
    }

    fn initialize(&mut self, _display: u32) -> Result<(), EglError> {
        self.initialize_calls += 1;
        match self.fail_initialize {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn choose_config(&mut self, _display: u32, spec: &EglConfigSpec) -> Result<Option<u32>, EglError> {
        self.last_spec = Some(spec.clone());
        if self.no_matching_config {
            return Ok(None);
        }
        Ok(Some(self.handle()))
    }

    fn create_window_surface(&mut self, _display: u32, _config: u32) -> Result<u32, EglError> {
        if !self.window_present {
            return Err(EglError::BadNativeWindow);
        }
        self.surfaces_created += 1;
        Ok(self.handle())
    }

    fn create_context(&mut self, _display: u32, _config: u32, client_version: i32) -> Result<u32, EglError> {
        self.contexts_created += 1;
        self.last_client_version = Some(client_version);
        Ok(self.handle())
    }

    fn make_current(&mut self, _display: u32, target: Option<(u32, u32)>) -> Result<(), EglError> {
        if target.is_some()
            && let Some(e) = self.fail_make_current
        {
            return Err(e);
        }
        self.current = target;
        Ok(())
    }

    fn destroy_surface(&mut self, _display: u32, _surface: u32) -> Result<(), EglError> {
        self.surfaces_destroyed += 1;
        Ok(())
    }

    fn destroy_context(&mut self, _display: u32, _context: u32) -> Result<(), EglError> {
        self.contexts_destroyed += 1;
        Ok(())
    }

    fn terminate(&mut self, _display: u32) -> Result<(), EglError> {
        self.terminate_calls += 1;
        self.terminated.set(self.terminated.get() + 1);
        Ok(())
    }

    fn query_surface_size(&mut self, _display: u32, _surface: u32) -> Result<SurfaceSize, EglError> {
        Ok(self.surface_size)
    }

    fn swap_buffers(&mut self, _display: u32, _surface: u32) -> Result<(), EglError> {
        match self.fail_swap {
            Some(e) => Err(e),
            None => {
                self.swaps += 1;
                Ok(())
            }
        }
    }
}
