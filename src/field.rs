//! The particle field: generation, fixed-step integration and wall bounces.

use eframe::epaint::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::f32::consts::TAU;

use crate::error::SimError;
use crate::particle::{self, Particle, Reflection};

/// Canvas size in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Result<Self, SimError> {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            Ok(Self { width, height })
        } else {
            Err(SimError::InvalidBounds { width, height })
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Parameters used to generate (and regenerate) the particles.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    pub count: usize,
    pub radius_mean: f32,
    pub radius_variance: f32,
    pub base_velocity: f32,
    pub spawn_variance: f32,
    pub seed: Option<u64>,
}

/// Seeded generator for reproducible runs, OS entropy otherwise.
fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Owns every particle on one canvas.
#[derive(Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    bounds: Bounds,
    config: FieldConfig,
    rng: StdRng,
}

impl ParticleField {
    /// Generates `config.count` particles centred on the canvas.
    pub fn create(config: FieldConfig, bounds: Bounds) -> Result<Self, SimError> {
        if config.count == 0 {
            return Err(SimError::NoParticles);
        }
        let bounds = Bounds::new(bounds.width, bounds.height)?;
        let rng = rng_for(config.seed);

        let mut field = Self {
            particles: Vec::with_capacity(config.count),
            bounds,
            config,
            rng,
        };
        field.populate();
        log::info!(
            "created {} particles on a {}x{} canvas",
            field.particles.len(),
            bounds.width,
            bounds.height
        );
        Ok(field)
    }

    /// Builds a field around hand-placed particles. `reset` still regenerates
    /// from `config`.
    pub fn with_particles(config: FieldConfig, bounds: Bounds, particles: Vec<Particle>) -> Result<Self, SimError> {
        if particles.is_empty() {
            return Err(SimError::NoParticles);
        }
        let bounds = Bounds::new(bounds.width, bounds.height)?;
        let rng = rng_for(config.seed);
        Ok(Self {
            particles,
            bounds,
            config,
            rng,
        })
    }

    fn populate(&mut self) {
        self.particles.clear();
        for _ in 0..self.config.count {
            let p = self.spawn_one();
            self.particles.push(p);
        }
    }

    fn spawn_one(&mut self) -> Particle {
        let cfg = &self.config;
        let rng = &mut self.rng;

        let radius = particle::sample_radius(rng, cfg.radius_mean, cfg.radius_variance);
        let speed = particle::speed_for_radius(cfg.base_velocity, radius);

        // Jitter around the centre, then keep the whole disc-ish area on canvas.
        let half = radius / 2.0;
        let centre = self.bounds.center();
        let x = centre.x + cfg.spawn_variance * particle::sample_standard_normal(rng);
        let y = centre.y + cfg.spawn_variance * particle::sample_standard_normal(rng);
        let x = particle::clamp_axis(x, half, self.bounds.width - half);
        let y = particle::clamp_axis(y, half, self.bounds.height - half);

        let direction: f32 = rng.random_range(0.0..TAU);
        let velocity = Vec2::new(speed * direction.cos(), speed * direction.sin());

        Particle::new(radius, Vec2::new(x, y), velocity)
    }

    /// Advances every particle by one fixed step. Returns how many bounced.
    pub fn tick(&mut self) -> usize {
        let Bounds { width, height } = self.bounds;
        let bounces = self
            .particles
            .par_iter_mut()
            .map(|p| p.step(width, height))
            .filter(|r| *r != Reflection::None)
            .count();
        log::trace!("tick: {bounces} reflections");
        bounces
    }

    /// Stores new canvas bounds. Particles stay where they are; invalid bounds
    /// are rejected and the previous ones kept.
    pub fn resize(&mut self, bounds: Bounds) -> Result<(), SimError> {
        let bounds = Bounds::new(bounds.width, bounds.height)?;
        if bounds != self.bounds {
            log::debug!("resize {}x{} -> {}x{}", self.bounds.width, self.bounds.height, bounds.width, bounds.height);
            self.bounds = bounds;
        }
        Ok(())
    }

    /// Throws away every particle and regenerates them with the original
    /// parameters on the current canvas.
    pub fn reset(&mut self) {
        self.populate();
        log::info!("regenerated {} particles", self.particles.len());
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Arithmetic mean of every radius.
    pub fn mean_radius(&self) -> f32 {
        let sum: f32 = self.particles.iter().map(|p| p.radius).sum();
        sum / self.particles.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn config(count: usize, seed: u64) -> FieldConfig {
        FieldConfig {
            count,
            radius_mean: 20.0,
            radius_variance: 5.0,
            base_velocity: 800.0,
            spawn_variance: 30.0,
            seed: Some(seed),
        }
    }

    fn canvas() -> Bounds {
        Bounds::new(800.0, 600.0).unwrap()
    }

    #[test]
    fn create_rejects_zero_count_and_bad_bounds() {
        assert_eq!(ParticleField::create(config(0, 1), canvas()).unwrap_err(), SimError::NoParticles);
        assert!(Bounds::new(0.0, 600.0).is_err());
        assert!(Bounds::new(800.0, -1.0).is_err());
        assert!(Bounds::new(f32::NAN, 600.0).is_err());

        let bad = Bounds { width: -5.0, height: 10.0 };
        assert!(matches!(
            ParticleField::create(config(3, 1), bad),
            Err(SimError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn create_generates_requested_count_near_centre() {
        let field = ParticleField::create(config(75, 42), canvas()).unwrap();
        assert_eq!(field.len(), 75);
        for p in field.particles() {
            assert!(p.radius > 0.0);
            assert!(!p.sampled);
            // 30 * 8 sigma is a very generous jitter envelope.
            assert!((p.position.x - 400.0).abs() < 240.0);
            assert!((p.position.y - 300.0).abs() < 240.0);
        }
    }

    #[test]
    fn momentum_like_quantity_is_shared() {
        let field = ParticleField::create(config(50, 9), canvas()).unwrap();
        for p in field.particles() {
            let base = p.speed() * PI * p.radius * p.radius;
            assert!((base - 800.0).abs() / 800.0 < 1e-3, "base velocity {base}");
        }
    }

    #[test]
    fn same_seed_same_field() {
        let a = ParticleField::create(config(20, 5), canvas()).unwrap();
        let b = ParticleField::create(config(20, 5), canvas()).unwrap();
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn reset_regenerates_all_particles() {
        let mut field = ParticleField::create(config(20, 5), canvas()).unwrap();
        let before = field.particles().to_vec();
        field.particles_mut()[0].sampled = true;
        field.reset();
        assert_eq!(field.len(), 20);
        assert_ne!(field.particles(), &before[..]);
        assert!(field.particles().iter().all(|p| !p.sampled));
    }

    #[test]
    fn resize_keeps_particles_in_place() {
        let mut field = ParticleField::create(config(10, 2), canvas()).unwrap();
        let before = field.particles().to_vec();
        field.resize(Bounds::new(300.0, 200.0).unwrap()).unwrap();
        assert_eq!(field.bounds(), Bounds { width: 300.0, height: 200.0 });
        assert_eq!(field.particles(), &before[..]);
    }

    #[test]
    fn invalid_resize_keeps_last_good_bounds() {
        let mut field = ParticleField::create(config(10, 2), canvas()).unwrap();
        let err = field.resize(Bounds { width: 0.0, height: 10.0 });
        assert!(err.is_err());
        assert_eq!(field.bounds(), canvas());
    }

    #[test]
    fn tick_moves_every_particle_by_its_velocity() {
        let particles = vec![
            Particle::new(10.0, Vec2::new(100.0, 100.0), Vec2::new(1.0, 2.0)),
            Particle::new(10.0, Vec2::new(200.0, 300.0), Vec2::new(-1.5, 0.5)),
        ];
        let mut field = ParticleField::with_particles(config(2, 1), canvas(), particles).unwrap();
        assert_eq!(field.tick(), 0);
        assert_eq!(field.particles()[0].position, Vec2::new(101.0, 102.0));
        assert_eq!(field.particles()[1].position, Vec2::new(198.5, 300.5));
    }

    #[test]
    fn mean_radius_is_plain_average() {
        let particles = vec![
            Particle::new(10.0, Vec2::new(100.0, 100.0), Vec2::ZERO),
            Particle::new(30.0, Vec2::new(200.0, 300.0), Vec2::ZERO),
        ];
        let field = ParticleField::with_particles(config(2, 1), canvas(), particles).unwrap();
        assert_eq!(field.mean_radius(), 20.0);
    }
}
