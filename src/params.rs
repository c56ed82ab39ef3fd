use crate::clock;
use crate::error::SimError;
use crate::field::FieldConfig;

// ===================================================================================
// Default Constants (used as initial slider defaults)
// ===================================================================================

pub const DEFAULT_NUM_PARTICLES: usize = 75;
pub const DEFAULT_RADIUS_MEAN: f32 = 20.0;
pub const DEFAULT_RADIUS_VARIANCE: f32 = 5.0;
pub const DEFAULT_BASE_VELOCITY: f32 = 800.0;
pub const DEFAULT_SPAWN_VARIANCE: f32 = 30.0;
pub const DEFAULT_MAX_SAMPLE: usize = 10;
pub const DEFAULT_FPS: f32 = 60.0;
pub const DEFAULT_BOUNDARY_FRACTION: f32 = 0.5;
pub const DEFAULT_HISTORY_LEN: usize = 600;

// ===================================================================================
// Simulation Parameters
// ===================================================================================

/// Configuration parameters that can be adjusted before (re)starting the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    pub num_particles: usize,
    /// Mean of the radius distribution.
    pub radius_mean: f32,
    /// Scale applied to the standard-normal radius sample.
    pub radius_variance: f32,
    /// Held constant as `speed * π * radius²` across particles.
    pub base_velocity: f32,
    /// Scale of the spawn jitter around the canvas centre.
    pub spawn_variance: f32,
    /// Nominal sample cap; the sampled set may hold one more than this.
    pub max_sample: usize,
    pub fps: f32,
    /// Initial boundary as a fraction of the canvas width.
    pub boundary_fraction: f32,
    /// Number of ticks kept for the statistics plot.
    pub history_len: usize,
    pub seed: Option<u64>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        SimulationParams {
            num_particles: DEFAULT_NUM_PARTICLES,
            radius_mean: DEFAULT_RADIUS_MEAN,
            radius_variance: DEFAULT_RADIUS_VARIANCE,
            base_velocity: DEFAULT_BASE_VELOCITY,
            spawn_variance: DEFAULT_SPAWN_VARIANCE,
            max_sample: DEFAULT_MAX_SAMPLE,
            fps: DEFAULT_FPS,
            boundary_fraction: DEFAULT_BOUNDARY_FRACTION,
            history_len: DEFAULT_HISTORY_LEN,
            seed: None,
        }
    }
}

impl SimulationParams {
    /// Checks every parameter, returning the first one that is out of range.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.num_particles == 0 {
            return Err(SimError::NoParticles);
        }
        if !(self.radius_mean.is_finite() && self.radius_mean > 0.0 && self.radius_variance.is_finite()) {
            return Err(SimError::InvalidRadius {
                mean: self.radius_mean,
                variance: self.radius_variance,
            });
        }
        if !(self.base_velocity.is_finite() && self.base_velocity > 0.0) {
            return Err(SimError::InvalidVelocity(self.base_velocity));
        }
        if !(self.spawn_variance.is_finite() && self.spawn_variance >= 0.0) {
            return Err(SimError::InvalidSpawnVariance(self.spawn_variance));
        }
        clock::tick_period(self.fps)?;
        if !(0.0..=1.0).contains(&self.boundary_fraction) {
            return Err(SimError::InvalidBoundaryFraction(self.boundary_fraction));
        }
        if self.history_len == 0 {
            return Err(SimError::EmptyHistory);
        }
        Ok(())
    }

    /// The subset of parameters the particle field needs to (re)generate particles.
    pub fn field_config(&self) -> FieldConfig {
        FieldConfig {
            count: self.num_particles,
            radius_mean: self.radius_mean,
            radius_variance: self.radius_variance,
            base_velocity: self.base_velocity,
            spawn_variance: self.spawn_variance,
            seed: self.seed,
        }
    }
}
