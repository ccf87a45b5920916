// Frame-rate readout: counts frames and publishes the count once per whole second.
// Visual: the "FPS: 60" tag in the HUD strip.

use std::time::{Duration, Instant};

pub const WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct FrameRateSampler {
    frames: u32,
    window_start: Instant,
    current: u32,
}

impl FrameRateSampler {
    pub fn new(now: Instant) -> Self {
        Self {
            frames: 0,
            window_start: now,
            current: 0,
        }
    }

    /// Count one frame. Once a second has elapsed since the window opened, the
    /// count becomes the published rate, the counter restarts at zero and
    /// `Some(rate)` is returned.
    pub fn tick(&mut self, now: Instant) -> Option<u32> {
        self.frames += 1;
        if now.saturating_duration_since(self.window_start) < WINDOW {
            return None;
        }
        self.current = self.frames;
        self.frames = 0;
        self.window_start = now;
        Some(self.current)
    }

    /// Last published rate; 0 until the first second has passed.
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Frames counted in the window that is still open.
    pub fn pending_frames(&self) -> u32 {
        self.frames
    }
}
