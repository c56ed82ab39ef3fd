use eframe::epaint::Vec2;
use rand::Rng;
use std::f32::consts::PI;

/// A single circular particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub radius: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Set by the sampling tracker once the particle has crossed the boundary.
    pub sampled: bool,
}

/// Which velocity axis (if any) a tick reflected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reflection {
    None,
    X,
    Y,
}

impl Particle {
    pub fn new(radius: f32, position: Vec2, velocity: Vec2) -> Self {
        Self {
            radius,
            position,
            velocity,
            sampled: false,
        }
    }

    /// Advances one fixed step and bounces off the canvas walls.
    ///
    /// The x axis is checked first; y is only considered when x is in range, so
    /// a particle out on both axes reflects on x alone this tick. The position
    /// is then pulled back inside on both axes.
    pub fn step(&mut self, width: f32, height: f32) -> Reflection {
        self.position += self.velocity;

        let half = self.radius / 2.0;
        let (x_lo, x_hi) = (half, width - half);
        let (y_lo, y_hi) = (half, height - half);

        let reflection = if self.position.x < x_lo || self.position.x > x_hi {
            self.velocity.x = reflect(self.position.x, self.velocity.x, x_lo);
            Reflection::X
        } else if self.position.y < y_lo || self.position.y > y_hi {
            self.velocity.y = reflect(self.position.y, self.velocity.y, y_lo);
            Reflection::Y
        } else {
            Reflection::None
        };

        self.position.x = clamp_axis(self.position.x, x_lo, x_hi);
        self.position.y = clamp_axis(self.position.y, y_lo, y_hi);

        reflection
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Negates `v` only if it still points out of the range; a component that
/// already heads back inside is left alone.
fn reflect(pos: f32, v: f32, lo: f32) -> f32 {
    if pos < lo { v.abs() } else { -v.abs() }
}

/// Like `f32::clamp`, but tolerates `lo > hi` (canvas narrower than the particle).
pub(crate) fn clamp_axis(v: f32, lo: f32, hi: f32) -> f32 {
    v.max(lo).min(hi)
}

// ===================================================================================
// Random sampling
// ===================================================================================

/// Box-Muller standard normal sample. Both uniforms are drawn from (0, 1).
pub fn sample_standard_normal(rng: &mut impl Rng) -> f32 {
    let mut u1: f32 = 0.0;
    while u1 == 0.0 {
        u1 = rng.random();
    }
    let mut u2: f32 = 0.0;
    while u2 == 0.0 {
        u2 = rng.random();
    }
    let r = (-2.0_f32 * u1.ln()).sqrt();
    let theta = 2.0_f32 * PI * u2;
    r * theta.cos()
}

/// `|mean + variance * N(0,1)|`, redrawn in the (practically unreachable) case
/// where that comes out as zero or non-finite.
pub fn sample_radius(rng: &mut impl Rng, mean: f32, variance: f32) -> f32 {
    loop {
        let radius = (mean + variance * sample_standard_normal(rng)).abs();
        if radius > 0.0 && radius.is_finite() {
            return radius;
        }
    }
}

/// Speed such that `speed * π * radius²` equals `base_velocity`.
pub fn speed_for_radius(base_velocity: f32, radius: f32) -> f32 {
    base_velocity / (PI * radius * radius)
}
