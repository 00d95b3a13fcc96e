//! Frame timing

use std::time::{Duration, Instant};

/// Longest step taken from wall-clock time
pub const MAX_WALL_STEP: f32 = 0.25;

/// Per-frame clock driven by wall-clock time or a fixed step
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_tick: Instant,
    delta: f32,
    elapsed: f64,
    frames: u64,
    max_wall_step: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Start a clock at the current instant
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            delta: 0.0,
            elapsed: 0.0,
            frames: 0,
            max_wall_step: MAX_WALL_STEP,
        }
    }

    /// Replace the wall-clock step limit
    pub fn with_max_wall_step(mut self, limit: f32) -> Self {
        self.max_wall_step = limit;
        self
    }

    /// Start a frame measuring the wall-clock time since the previous one
    ///
    /// Returns the (clamped) delta in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let measured = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.record(measured.as_secs_f32().min(self.max_wall_step))
    }

    /// Start a frame of exactly `step` seconds
    pub fn tick_fixed(&mut self, step: f32) -> f32 {
        self.last_tick = Instant::now();
        self.record(step)
    }

    fn record(&mut self, delta: f32) -> f32 {
        self.delta = delta;
        self.elapsed += f64::from(delta);
        self.frames += 1;
        delta
    }

    /// Delta of the current frame in seconds
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Simulated time since the clock started
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed)
    }

    /// Frames started so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames per simulated second, 0 before any time has passed
    pub fn average_fps(&self) -> f64 {
        if self.elapsed > 0.0 {
            self.frames as f64 / self.elapsed
        } else {
            0.0
        }
    }
}
