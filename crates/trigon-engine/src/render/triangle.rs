use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;
use crate::input::{TouchEvent, TouchPhase};

/// Interleaved vertex as uploaded to the GL array buffer.
///
/// Layout (32 bytes): color rgba, position xy, offset xy.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub color: [f32; 4],
    pub position: [f32; 2],
    pub offset: [f32; 2],
}

impl Vertex {
    pub const STRIDE: i32 = size_of::<Vertex>() as i32;
    pub const COLOR_OFFSET: i32 = 0;
    pub const POSITION_OFFSET: i32 = 4 * size_of::<f32>() as i32;
    pub const OFFSET_OFFSET: i32 = 6 * size_of::<f32>() as i32;
}

const COLORS: [[f32; 4]; 3] = [
    [1.0, 0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0, 1.0],
];

const ORIGIN: [Vec2; 3] = [
    Vec2::new(0.0, -0.5),
    Vec2::new(-0.5, 0.5),
    Vec2::new(0.5, 0.5),
];

/// State persisted across process death.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct SavedState {
    pub phase: f32,
    pub origin: [[f32; 2]; 3],
}

impl SavedState {
    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::bytes_of(self).to_vec()
    }

    /// Decodes bytes produced by `to_bytes`; `None` on a size mismatch.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        bytemuck::try_pod_read_unaligned(bytes).ok()
    }
}

/// The rotating, draggable triangle.
///
/// `origin` holds the unrotated corner positions (NDC). Move touches translate
/// them; `advance` rotates them by the current phase into `vertices`.
#[derive(Debug, Clone)]
pub struct TriangleScene {
    origin: [Vec2; 3],
    vertices: [Vertex; 3],
    phase: f32,
    step: f32,
}

impl TriangleScene {
    /// `step` is the rotation added per drawn frame, in radians.
    pub fn new(step: f32) -> Self {
        let mut scene = Self {
            origin: ORIGIN,
            vertices: [Vertex::default(); 3],
            phase: 0.0,
            step,
        };
        for (v, color) in scene.vertices.iter_mut().zip(COLORS) {
            v.color = color;
        }
        scene.rotate();
        scene
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn origin(&self) -> [Vec2; 3] {
        self.origin
    }

    pub fn vertices(&self) -> &[Vertex; 3] {
        &self.vertices
    }

    /// Applies a normalized touch event. Drags shift the triangle by the
    /// normalized delta.
    pub fn on_touch(&mut self, ev: &TouchEvent<'_>) {
        log::debug!("{ev}");

        if let TouchPhase::Move { delta } = ev.phase {
            for p in &mut self.origin {
                *p += delta;
            }
        }
    }

    /// Advances the rotation one step and returns the rotated vertices.
    pub fn advance(&mut self) -> &[Vertex; 3] {
        self.phase = (self.phase + self.step) % TAU;
        self.rotate();
        &self.vertices
    }

    pub fn save(&self) -> SavedState {
        SavedState {
            phase: self.phase,
            origin: self.origin.map(|p| [p.x, p.y]),
        }
    }

    pub fn restore(&mut self, state: &SavedState) {
        self.phase = state.phase;
        self.origin = state.origin.map(|[x, y]| Vec2::new(x, y));
        self.rotate();
    }

    fn rotate(&mut self) {
        let (s, c) = self.phase.sin_cos();
        for (v, p) in self.vertices.iter_mut().zip(self.origin) {
            v.position = [p.x * c - p.y * s, p.x * s + p.y * c];
        }
    }
}
