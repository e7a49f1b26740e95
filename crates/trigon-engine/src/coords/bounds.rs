use super::Vec2;

/// Drawable surface size in physical pixels, as reported by EGL.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SurfaceSize {
    pub width: i32,
    pub height: i32,
}

impl SurfaceSize {
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Motion range used to normalize touches on this surface.
    #[inline]
    pub fn bounds(self) -> Bounds {
        Bounds::new(
            Vec2::zero(),
            Vec2::new(self.width as f32, self.height as f32),
        )
    }
}

/// Axis-aligned motion range of a touch event.
///
/// Normalization divides by `max` only; `min` is carried along for consumers
/// but is always the origin for surface-bound touches.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    #[inline]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Returns `false` when either extent is zero, negative or non-finite.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.max.is_finite() && self.max.x > 0.0 && self.max.y > 0.0
    }

    /// Scales a raw position into `[0, 1]` on each axis.
    #[inline]
    pub fn normalize(self, raw: Vec2) -> Vec2 {
        Vec2::new(raw.x / self.max.x, raw.y / self.max.y)
    }
}
