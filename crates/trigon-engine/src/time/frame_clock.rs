use std::time::{Duration, Instant};

/// Snapshot taken when a frame is presented.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous presented frame, clamped.
    pub dt: f32,

    /// Zero-based index of this frame.
    pub frame_index: u64,
}

/// Counts presented frames and measures the gap between them.
///
/// The gap is clamped: the activity may sit stopped for minutes between two
/// frames and that pause is not frame time.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    frames: u64,
    max_dt: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_max_dt(Duration::from_millis(250))
    }

    pub fn with_max_dt(max_dt: Duration) -> Self {
        Self {
            last: None,
            frames: 0,
            max_dt,
        }
    }

    /// Frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Forgets the previous timestamp, e.g. after the window came back.
    ///
    /// The next tick reports a zero delta.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Records a presented frame.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = match self.last {
            Some(last) => now.saturating_duration_since(last).min(self.max_dt),
            None => Duration::ZERO,
        };
        self.last = Some(now);

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            frame_index: self.frames,
        };
        self.frames = self.frames.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
