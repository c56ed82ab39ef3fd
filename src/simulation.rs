//! Tick driver tying the particle field to the sampling tracker.
//!
//! One tick is always: move particles, classify, compute statistics. Boundary
//! and resize notifications come in through `&mut self` as well, so they are
//! serialized with ticks.

use crate::error::SimError;
use crate::field::{Bounds, ParticleField};
use crate::history::StatsHistory;
use crate::params::SimulationParams;
use crate::render::{Frame, RenderSink};
use crate::sampling::{SamplingTracker, Statistics};

#[derive(Debug)]
pub struct Simulation {
    field: ParticleField,
    tracker: SamplingTracker,
    history: StatsHistory,
    statistics: Statistics,
    /// Ticks since the last restart.
    tick: u64,
}

impl Simulation {
    pub fn new(params: &SimulationParams, bounds: Bounds) -> Result<Self, SimError> {
        params.validate()?;
        let field = ParticleField::create(params.field_config(), bounds)?;
        let tracker = SamplingTracker::new(params.boundary_fraction * field.bounds().width, params.max_sample)?;
        Ok(Self::from_parts(field, tracker, params.history_len))
    }

    /// Wraps an existing field and tracker.
    pub fn from_parts(field: ParticleField, tracker: SamplingTracker, history_len: usize) -> Self {
        let statistics = tracker.compute_statistics(&field);
        Self {
            field,
            tracker,
            history: StatsHistory::new(history_len),
            statistics,
            tick: 0,
        }
    }

    /// Runs one fixed step and returns the fresh statistics.
    pub fn step(&mut self) -> Statistics {
        self.field.tick();
        self.tracker.tick(&mut self.field);
        self.statistics = self.tracker.compute_statistics(&self.field);
        self.tick += 1;
        self.history.push(self.tick, self.statistics);
        self.statistics
    }

    /// Boundary notifier while the handle is being dragged. Bad values are
    /// logged and ignored.
    pub fn set_boundary(&mut self, x: f32) {
        match self.tracker.set_boundary(x) {
            Ok(()) => log::debug!("boundary moved to {x:.1}"),
            Err(e) => log::warn!("ignoring boundary update: {e}"),
        }
    }

    /// Boundary notifier when the drag ends: move the boundary and start a
    /// fresh epoch with new particles and no samples.
    pub fn finish_drag(&mut self, x: f32) {
        self.set_boundary(x);
        self.restart();
    }

    /// Regenerates the particles and forgets every sample. The boundary and
    /// the schedule are untouched.
    pub fn restart(&mut self) {
        self.field.reset();
        self.tracker.reset();
        self.history.clear();
        self.tick = 0;
        self.statistics = self.tracker.compute_statistics(&self.field);
        log::info!("restarted with boundary at {:.1}", self.tracker.boundary_x());
    }

    /// Resize notifier. Invalid bounds are logged and the previous ones kept.
    pub fn resize(&mut self, bounds: Bounds) {
        if let Err(e) = self.field.resize(bounds) {
            log::warn!("ignoring resize: {e}");
        }
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            particles: self.field.particles(),
            bounds: self.field.bounds(),
            boundary_x: self.tracker.boundary_x(),
            statistics: self.statistics,
        }
    }

    pub fn render(&self, sink: &mut impl RenderSink) {
        sink.render(&self.frame());
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn tracker(&self) -> &SamplingTracker {
        &self.tracker
    }

    pub fn history(&self) -> &StatsHistory {
        &self.history
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }
}
