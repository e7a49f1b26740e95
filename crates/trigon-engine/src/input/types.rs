use std::fmt;

use crate::coords::{Bounds, Vec2};

/// Masked action of a raw motion event.
///
/// `PointerDown` / `PointerUp` carry the index of the pointer that changed
/// inside the sample's pointer list. That index is positional and unrelated to
/// the pointer id.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MotionAction {
    /// First finger touched the screen; the changed pointer is at index 0.
    Down,
    PointerDown { index: usize },
    /// Last finger left the screen; the changed pointer is at index 0.
    Up,
    PointerUp { index: usize },
    /// One or more pointers moved; every pointer in the sample is current.
    Move,
    /// The system aborted the gesture.
    Cancel,
    /// Hover, scroll, button and other actions the tracker ignores.
    Other,
}

/// One pointer inside a raw motion sample, in surface pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerSample {
    pub id: i32,
    pub x: f32,
    pub y: f32,
}

impl PointerSample {
    #[inline]
    pub const fn new(id: i32, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Raw motion event as delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionSample {
    pub action: MotionAction,
    pub pointers: Vec<PointerSample>,
}

impl MotionSample {
    pub fn new(action: MotionAction, pointers: Vec<PointerSample>) -> Self {
        Self { action, pointers }
    }

    #[inline]
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }
}

/// Phase of a normalized touch event.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TouchPhase {
    Down,
    Up,
    /// Movement since the previous stored position, in normalized units.
    Move { delta: Vec2 },
}

/// Normalized touch event for a single finger.
///
/// Borrowed from the sample it was cooked from; it lives only for the duration
/// of the tracker callback.
#[derive(Debug, Copy, Clone)]
pub struct TouchEvent<'a> {
    pub phase: TouchPhase,
    pub id: i32,
    /// Raw position in surface pixels.
    pub pos: Vec2,
    /// Position normalized to `[0, 1]` by `bounds`.
    pub norm_pos: Vec2,
    pub bounds: Bounds,
    /// Index of this pointer inside `source.pointers`.
    pub pointer_index: usize,
    pub source: &'a MotionSample,
}

impl TouchEvent<'_> {
    /// Normalized delta for move events, zero otherwise.
    pub fn delta(&self) -> Vec2 {
        match self.phase {
            TouchPhase::Move { delta } => delta,
            TouchPhase::Down | TouchPhase::Up => Vec2::zero(),
        }
    }
}

impl fmt::Display for TouchEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.phase {
            TouchPhase::Down => "Down",
            TouchPhase::Up => "Up",
            TouchPhase::Move { .. } => "Move",
        };
        write!(
            f,
            "{dir} event x={:.4} y={:.4} pointer_count={} pointer_index={} id={}",
            self.norm_pos.x,
            self.norm_pos.y,
            self.source.pointer_count(),
            self.pointer_index,
            self.id,
        )?;
        if let TouchPhase::Move { delta } = self.phase {
            write!(f, " moving {:.4}, {:.4}", delta.x, delta.y)?;
        }
        Ok(())
    }
}
