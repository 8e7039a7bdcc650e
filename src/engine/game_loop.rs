/// Fixed-timestep driver for a [`Scene`]
///
/// Accumulates measured frame time and converts it into a whole number of
/// scene ticks of constant `dt`, so the simulation behaves the same no matter
/// how fast frames are drawn.
use std::time::{Duration, Instant};

use super::physics::Scene;

/// Default simulation step (120 ticks per second)
pub const FIXED_TIMESTEP: f64 = 1.0 / 120.0;

/// Maximum number of ticks per frame to prevent spiral of death
pub const MAX_PHYSICS_STEPS: u32 = 8;

/// FPS tracking window (average over last N frames)
const FPS_WINDOW_SIZE: usize = 60;

/// Stepper tunables
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepperConfig {
    /// Seconds of simulated time per scene tick
    pub timestep: f64,
    /// Upper bound on ticks run for a single frame
    pub max_steps_per_frame: u32,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            timestep: FIXED_TIMESTEP,
            max_steps_per_frame: MAX_PHYSICS_STEPS,
        }
    }
}

/// Frame timing state
pub struct Stepper {
    config: StepperConfig,

    /// Simulated time owed to the scene (seconds)
    accumulator: f64,

    /// Time of last frame, for wall-clock driven loops
    last_frame_time: Instant,

    /// Whether the simulation is paused
    paused: bool,

    /// Frame timing history for FPS calculation
    frame_times: Vec<Duration>,

    /// Frames seen so far
    frame_count: u64,

    /// Scene ticks handed out so far
    tick_count: u64,

    /// Current FPS (updated periodically)
    current_fps: f64,
}

impl Stepper {
    /// Create a stepper with the default configuration
    pub fn new() -> Self {
        Self::with_config(StepperConfig::default())
    }

    pub fn with_config(config: StepperConfig) -> Self {
        assert!(config.timestep > 0.0, "timestep must be positive");
        Self {
            config,
            accumulator: 0.0,
            last_frame_time: Instant::now(),
            paused: false,
            frame_times: Vec::with_capacity(FPS_WINDOW_SIZE),
            frame_count: 0,
            tick_count: 0,
            current_fps: 0.0,
        }
    }

    /// Measure the wall time since the previous frame and advance by it
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(frame_time)
    }

    /// Account for `frame_time` and return the number of ticks to run
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.frame_count += 1;

        self.frame_times.push(frame_time);
        if self.frame_times.len() > FPS_WINDOW_SIZE {
            self.frame_times.remove(0);
        }
        if self.frame_count % 10 == 0 {
            self.update_fps();
        }

        if self.paused {
            return 0;
        }

        self.accumulator += frame_time.as_secs_f64();

        let mut steps = 0;
        while self.accumulator >= self.config.timestep && steps < self.config.max_steps_per_frame {
            self.accumulator -= self.config.timestep;
            steps += 1;
        }

        // Drop time we refused to simulate instead of carrying it forever
        if steps == self.config.max_steps_per_frame && self.accumulator >= self.config.timestep {
            log::warn!(
                "Frame of {:?} exceeded {} ticks, dropping {:.4}s",
                frame_time,
                steps,
                self.accumulator
            );
            self.accumulator %= self.config.timestep;
        }

        self.tick_count += steps as u64;
        steps
    }

    /// Advance by `frame_time` and tick `scene` accordingly
    pub fn run(&mut self, scene: &mut Scene, frame_time: Duration) -> u32 {
        let steps = self.advance(frame_time);
        for _ in 0..steps {
            scene.tick(self.config.timestep);
        }
        steps
    }

    pub fn config(&self) -> &StepperConfig {
        &self.config
    }

    pub fn timestep(&self) -> f64 {
        self.config.timestep
    }

    /// Fraction of a tick left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.config.timestep
    }

    pub fn fps(&self) -> f64 {
        self.current_fps
    }

    /// Simulated seconds handed out so far
    pub fn simulated_time(&self) -> f64 {
        self.tick_count as f64 * self.config.timestep
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = 0.0;
            self.last_frame_time = Instant::now();
            log::info!("Simulation resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    fn update_fps(&mut self) {
        if self.frame_times.is_empty() {
            self.current_fps = 0.0;
            return;
        }

        let total: Duration = self.frame_times.iter().sum();
        let average = total.as_secs_f64() / self.frame_times.len() as f64;
        self.current_fps = if average > 0.0 { 1.0 / average } else { 0.0 };
    }
}

impl Default for Stepper {
    fn default() -> Self {
        Self::new()
    }
}
