//! Sampling-bias demo: a field of bouncing particles split by a draggable
//! boundary, comparing the true average radius with the average radius of the
//! particles that happened to wander into the sampled region.

pub mod app;
pub mod clock;
pub mod error;
pub mod field;
pub mod history;
pub mod params;
pub mod particle;
pub mod render;
pub mod sampling;
pub mod simulation;

pub use app::SamplingApp;
pub use clock::FixedRateTicker;
pub use error::SimError;
pub use field::{Bounds, ParticleField};
pub use history::StatsHistory;
pub use params::SimulationParams;
pub use particle::{Particle, Reflection};
pub use render::{Frame, RenderSink};
pub use sampling::{SamplingTracker, Statistics};
pub use simulation::Simulation;
