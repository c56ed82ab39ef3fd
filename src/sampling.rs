//! Sampling classification and the two running averages it drives.

use std::fmt;

use crate::error::SimError;
use crate::field::ParticleField;

/// Statistics computed once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub true_mean: f32,
    /// `None` until at least one particle has been sampled.
    pub sampled_mean: Option<f32>,
    pub sampled_count: usize,
}

impl Statistics {
    pub fn true_label(&self) -> String {
        format!("True Average Radius: {}", RadiusLabel(Some(self.true_mean)))
    }

    pub fn sampled_label(&self) -> String {
        format!("Sampled Average Radius: {}", RadiusLabel(self.sampled_mean))
    }

    /// Sampled mean minus true mean, when there is a sample.
    pub fn bias(&self) -> Option<f32> {
        self.sampled_mean.map(|m| m - self.true_mean)
    }
}

/// Two decimals, or `n/a` for an empty sample.
struct RadiusLabel(Option<f32>);

impl fmt::Display for RadiusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v:.2}"),
            None => f.write_str("n/a"),
        }
    }
}

/// Tracks which particles have drifted left of the boundary.
///
/// The sampled set only grows between resets. The cap check is `len <= max`,
/// so the set can end up holding `max_sample + 1` indices.
///
/// Membership lives here alone; each particle's `sampled` flag is rewritten
/// from it on every tick.
#[derive(Debug, Clone)]
pub struct SamplingTracker {
    boundary_x: f32,
    max_sample: usize,
    sampled: Vec<usize>, // in sampling order
    member: Vec<bool>,   // indexed by particle
}

impl SamplingTracker {
    pub fn new(boundary_x: f32, max_sample: usize) -> Result<Self, SimError> {
        if !boundary_x.is_finite() {
            return Err(SimError::InvalidBoundary(boundary_x));
        }
        Ok(Self {
            boundary_x,
            max_sample,
            sampled: Vec::with_capacity(max_sample + 1),
            member: Vec::new(),
        })
    }

    /// Moves the boundary. Particles already sampled stay sampled.
    pub fn set_boundary(&mut self, x: f32) -> Result<(), SimError> {
        if !x.is_finite() {
            return Err(SimError::InvalidBoundary(x));
        }
        self.boundary_x = x;
        Ok(())
    }

    /// Samples every not-yet-sampled particle that currently sits left of the
    /// boundary, while the cap allows.
    pub fn tick(&mut self, field: &mut ParticleField) {
        let before = self.sampled.len();
        let particles = field.particles_mut();
        if self.member.len() < particles.len() {
            self.member.resize(particles.len(), false);
        }
        for (i, p) in particles.iter_mut().enumerate() {
            if !self.member[i] && p.position.x < self.boundary_x && self.sampled.len() <= self.max_sample {
                self.member[i] = true;
                self.sampled.push(i);
            }
            p.sampled = self.member[i];
        }
        if self.sampled.len() != before {
            log::debug!("sampled {} -> {} particles", before, self.sampled.len());
        }
    }

    pub fn compute_statistics(&self, field: &ParticleField) -> Statistics {
        let particles = field.particles();
        let sampled_mean = if self.sampled.is_empty() {
            None
        } else {
            let sum: f32 = self.sampled.iter().map(|&i| particles[i].radius).sum();
            Some(sum / self.sampled.len() as f32)
        };
        Statistics {
            true_mean: field.mean_radius(),
            sampled_mean,
            sampled_count: self.sampled.len(),
        }
    }

    /// Forgets every sample. The boundary stays put; particle flags are
    /// cleared on the next tick.
    pub fn reset(&mut self) {
        self.sampled.clear();
        self.member.fill(false);
    }

    pub fn boundary_x(&self) -> f32 {
        self.boundary_x
    }

    pub fn max_sample(&self) -> usize {
        self.max_sample
    }

    /// Sampled indices in the order they were sampled.
    pub fn sampled_indices(&self) -> &[usize] {
        &self.sampled
    }

    pub fn is_sampled(&self, index: usize) -> bool {
        self.member.get(index).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Bounds, FieldConfig};
    use crate::particle::Particle;
    use eframe::epaint::Vec2;

    fn field_with_xs(xs: &[f32]) -> ParticleField {
        let config = FieldConfig {
            count: xs.len(),
            radius_mean: 20.0,
            radius_variance: 5.0,
            base_velocity: 800.0,
            spawn_variance: 30.0,
            seed: Some(1),
        };
        let particles = xs
            .iter()
            .enumerate()
            .map(|(i, &x)| Particle::new(10.0 + i as f32, Vec2::new(x, 300.0), Vec2::ZERO))
            .collect();
        ParticleField::with_particles(config, Bounds::new(800.0, 600.0).unwrap(), particles).unwrap()
    }

    #[test]
    fn samples_particles_left_of_boundary() {
        let mut field = field_with_xs(&[100.0, 500.0, 399.0, 400.0]);
        let mut tracker = SamplingTracker::new(400.0, 10).unwrap();
        tracker.tick(&mut field);
        assert_eq!(tracker.sampled_indices(), &[0, 2]);
        assert!(field.particles()[0].sampled);
        assert!(!field.particles()[3].sampled, "x == boundary is not left of it");
    }

    #[test]
    fn cap_allows_one_extra_sample() {
        let xs = vec![10.0; 8];
        let mut field = field_with_xs(&xs);
        let mut tracker = SamplingTracker::new(400.0, 3).unwrap();
        tracker.tick(&mut field);
        assert_eq!(tracker.sampled_indices().len(), 4);
        tracker.tick(&mut field);
        assert_eq!(tracker.sampled_indices().len(), 4);
    }

    #[test]
    fn moving_boundary_does_not_unsample() {
        let mut field = field_with_xs(&[100.0, 300.0]);
        let mut tracker = SamplingTracker::new(400.0, 10).unwrap();
        tracker.tick(&mut field);
        tracker.set_boundary(50.0).unwrap();
        tracker.tick(&mut field);
        assert_eq!(tracker.sampled_indices(), &[0, 1]);
    }

    #[test]
    fn invalid_boundary_keeps_previous_value() {
        let mut tracker = SamplingTracker::new(400.0, 10).unwrap();
        assert!(matches!(tracker.set_boundary(f32::NAN), Err(SimError::InvalidBoundary(_))));
        assert_eq!(tracker.boundary_x(), 400.0);
        assert!(SamplingTracker::new(f32::INFINITY, 10).is_err());
    }

    #[test]
    fn statistics_track_true_and_sampled_means() {
        // radii 10, 11, 12
        let mut field = field_with_xs(&[100.0, 700.0, 200.0]);
        let mut tracker = SamplingTracker::new(400.0, 10).unwrap();

        let empty = tracker.compute_statistics(&field);
        assert_eq!(empty.sampled_mean, None);
        assert_eq!(empty.sampled_count, 0);
        assert!((empty.true_mean - 11.0).abs() < 1e-6);

        tracker.tick(&mut field);
        let stats = tracker.compute_statistics(&field);
        assert_eq!(stats.sampled_count, 2);
        assert_eq!(stats.sampled_mean, Some(11.0));
        assert_eq!(stats.bias(), Some(0.0));
    }

    #[test]
    fn reset_clears_samples_but_not_boundary() {
        let mut field = field_with_xs(&[100.0]);
        let mut tracker = SamplingTracker::new(400.0, 10).unwrap();
        tracker.tick(&mut field);
        tracker.reset();
        assert!(tracker.sampled_indices().is_empty());
        assert_eq!(tracker.boundary_x(), 400.0);
        assert_eq!(tracker.compute_statistics(&field).sampled_mean, None);
    }

    #[test]
    fn sampling_resumes_after_tracker_reset() {
        let mut field = field_with_xs(&[100.0, 500.0]);
        let mut tracker = SamplingTracker::new(400.0, 10).unwrap();
        tracker.tick(&mut field);
        tracker.reset();
        assert!(!tracker.is_sampled(0));

        tracker.tick(&mut field);
        assert_eq!(tracker.sampled_indices(), &[0]);
        assert!(field.particles()[0].sampled);
    }

    #[test]
    fn flags_follow_tracker_after_reset() {
        let mut field = field_with_xs(&[100.0, 200.0]);
        let mut tracker = SamplingTracker::new(400.0, 10).unwrap();
        tracker.tick(&mut field);
        tracker.reset();
        tracker.set_boundary(150.0).unwrap();
        tracker.tick(&mut field);
        assert_eq!(tracker.sampled_indices(), &[0]);
        assert!(field.particles()[0].sampled);
        assert!(!field.particles()[1].sampled, "stale flag survived the reset");
    }

    #[test]
    fn field_reset_does_not_duplicate_samples() {
        let xs = vec![100.0; 6];
        let mut field = field_with_xs(&xs);
        let mut tracker = SamplingTracker::new(400.0, 100).unwrap();
        tracker.tick(&mut field);
        assert_eq!(tracker.sampled_indices().len(), 6);

        // Every fresh particle is left of the boundary, but each index is
        // already a member.
        field.reset();
        tracker.set_boundary(800.0).unwrap();
        tracker.tick(&mut field);

        let mut seen = tracker.sampled_indices().to_vec();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), tracker.sampled_indices().len());
        assert_eq!(tracker.sampled_indices().len(), 6);
        assert!(field.particles().iter().all(|p| p.sampled));
    }

    #[test]
    fn labels_use_two_decimals() {
        let stats = Statistics { true_mean: 20.456, sampled_mean: Some(18.0), sampled_count: 3 };
        assert_eq!(stats.true_label(), "True Average Radius: 20.46");
        assert_eq!(stats.sampled_label(), "Sampled Average Radius: 18.00");

        let empty = Statistics { sampled_mean: None, ..stats };
        assert_eq!(empty.sampled_label(), "Sampled Average Radius: n/a");
        assert_eq!(empty.bias(), None);
    }
}
