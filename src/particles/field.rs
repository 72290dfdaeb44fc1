//! Particle field simulation
//!
//! Particles orbit the canvas center in polar coordinates. Every frame each
//! particle turns by its own angular speed and falls inward by a fixed
//! decrement; once it gets close enough to the center it respawns at a new
//! random angle and distance. Nothing else about a particle ever changes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::f64::consts::TAU;

/// Tuning for the particle field
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of live particles
    pub count: usize,
    /// Distance lost per frame
    pub decrement: f64,
    /// Particles closer than this to the center respawn
    pub respawn_threshold: f64,
    /// Lower bound of the spawn distance range
    pub min_spawn_distance: f64,
    /// Width of the spawn range as a fraction of the shorter canvas side
    pub spawn_span_ratio: f64,
    /// Angular speed range in radians per frame
    pub min_speed: f64,
    pub max_speed: f64,
    /// Upper bound of the particle radius
    pub max_radius: f64,
    /// Opacity range applied on top of the palette color
    pub min_opacity: f64,
    pub max_opacity: f64,
    /// Horizontal scale applied to distance (ellipse effect)
    pub horizontal_stretch: f64,
    /// Radius of the central gradient disk
    pub disk_radius: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: 200,
            decrement: 0.05,
            respawn_threshold: 5.0,
            min_spawn_distance: 20.0,
            spawn_span_ratio: 0.5,
            min_speed: 0.002,
            max_speed: 0.007,
            max_radius: 2.0,
            min_opacity: 0.1,
            max_opacity: 0.6,
            horizontal_stretch: 0.8,
            disk_radius: 80.0,
        }
    }
}

/// One point of the field in polar coordinates around the center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Radians, kept in `[0, 2π)`
    pub angle: f64,
    /// Distance from the center, always positive
    pub distance: f64,
    /// Radians added per frame
    pub speed: f64,
    pub radius: f64,
    pub opacity: f64,
}

/// A fixed-size set of particles over a canvas of known size
#[derive(Debug)]
pub struct ParticleField {
    config: FieldConfig,
    width: f64,
    height: f64,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleField {
    /// Create a field seeded from OS entropy
    pub fn new(config: FieldConfig, width: f64, height: f64) -> Self {
        Self::with_rng(config, width, height, StdRng::from_entropy())
    }

    /// Create a reproducible field
    pub fn with_seed(config: FieldConfig, width: f64, height: f64, seed: u64) -> Self {
        Self::with_rng(config, width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: FieldConfig, width: f64, height: f64, rng: StdRng) -> Self {
        let mut field = Self {
            config,
            width: width.max(0.0),
            height: height.max(0.0),
            particles: Vec::new(),
            rng,
        };
        field.regenerate();
        field
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Range new distances are drawn from: `[min, min + span)`
    pub fn spawn_range(&self) -> (f64, f64) {
        let span = self.width.min(self.height) * self.config.spawn_span_ratio;
        let min = self.config.min_spawn_distance;
        (min, min + span.max(0.0))
    }

    /// Adopt a new canvas size, discarding every particle
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.regenerate();
        tracing::debug!(
            "Particle field resized to {}x{} ({} particles)",
            self.width,
            self.height,
            self.particles.len()
        );
    }

    /// Advance one frame. Returns how many particles respawned.
    pub fn step(&mut self) -> usize {
        let threshold = self.config.respawn_threshold.max(f64::MIN_POSITIVE);
        let decrement = self.config.decrement;
        let mut respawned = 0;

        for i in 0..self.particles.len() {
            let particle = &mut self.particles[i];
            particle.angle = (particle.angle + particle.speed).rem_euclid(TAU);
            particle.distance -= decrement;

            if particle.distance < threshold {
                let angle = self.random_angle();
                let distance = self.random_distance();
                let particle = &mut self.particles[i];
                particle.angle = angle;
                particle.distance = distance;
                respawned += 1;
            }
        }

        respawned
    }

    /// Screen position of a particle around the canvas center
    pub fn position(&self, particle: &Particle) -> (f64, f64) {
        let (cx, cy) = self.center();
        (
            cx + particle.angle.cos() * particle.distance * self.config.horizontal_stretch,
            cy + particle.angle.sin() * particle.distance,
        )
    }

    fn regenerate(&mut self) {
        let count = self.config.count;
        let particles = (0..count).map(|_| self.spawn()).collect();
        self.particles = particles;
    }

    fn spawn(&mut self) -> Particle {
        let config = &self.config;
        let (min_speed, max_speed) = (config.min_speed, config.max_speed);
        let max_radius = config.max_radius;
        let (min_opacity, max_opacity) = (config.min_opacity, config.max_opacity);

        Particle {
            angle: self.random_angle(),
            distance: self.random_distance(),
            speed: self.uniform(min_speed, max_speed),
            radius: self.uniform(0.0, max_radius),
            opacity: self.uniform(min_opacity, max_opacity),
        }
    }

    fn random_angle(&mut self) -> f64 {
        self.uniform(0.0, TAU)
    }

    fn random_distance(&mut self) -> f64 {
        let (min, max) = self.spawn_range();
        self.uniform(min, max)
    }

    /// Uniform draw from `[low, high)`; a degenerate range yields `low`
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + self.rng.gen::<f64>() * (high - low).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_field() -> ParticleField {
        ParticleField::with_seed(FieldConfig::default(), 800.0, 600.0, 7)
    }

    #[test]
    fn test_initial_particles_within_config() {
        let field = create_field();
        let config = field.config();
        let (min, max) = field.spawn_range();

        assert_eq!(field.particles().len(), 200);
        assert_eq!((min, max), (20.0, 320.0));

        for p in field.particles() {
            assert!((0.0..TAU).contains(&p.angle));
            assert!(p.distance >= min && p.distance < max);
            assert!(p.speed >= config.min_speed && p.speed < config.max_speed);
            assert!(p.radius >= 0.0 && p.radius < config.max_radius);
            assert!(p.opacity >= config.min_opacity && p.opacity < config.max_opacity);
        }
    }

    #[test]
    fn test_step_advances_angle_by_own_speed() {
        let mut field = create_field();

        for _ in 0..50 {
            let before = field.particles().to_vec();
            field.step();

            for (old, new) in before.iter().zip(field.particles()) {
                assert_eq!(new.speed, old.speed);
                assert_eq!(new.radius, old.radius);
                assert_eq!(new.opacity, old.opacity);

                let fell = (old.distance - new.distance - 0.05).abs() < 1e-9;
                if fell {
                    let turned = (new.angle - old.angle).rem_euclid(TAU);
                    assert!((turned - old.speed).abs() < 1e-9);
                    assert!(turned > 0.0);
                }
            }
        }
    }

    #[test]
    fn test_respawn_lands_in_spawn_range() {
        let config = FieldConfig {
            count: 50,
            ..Default::default()
        };
        let mut field = ParticleField::with_seed(config, 100.0, 60.0, 42);
        let (min, max) = field.spawn_range();
        let mut total_respawned = 0;

        // Enough frames for every particle to reach the center at least once
        for _ in 0..2000 {
            let before = field.particles().to_vec();
            total_respawned += field.step();

            for (old, new) in before.iter().zip(field.particles()) {
                assert!(new.distance > 0.0);
                if old.distance - 0.05 < 5.0 {
                    assert!(new.distance >= min && new.distance < max);
                    assert!((0.0..TAU).contains(&new.angle));
                }
            }
        }

        assert!(total_respawned >= 50);
    }

    #[test]
    fn test_resize_regenerates() {
        let mut field = create_field();
        let before = field.particles().to_vec();

        field.resize(300.0, 1000.0);

        assert_eq!(field.particles().len(), 200);
        assert_ne!(field.particles(), before.as_slice());
        assert_eq!(field.spawn_range(), (20.0, 170.0));
        for p in field.particles() {
            assert!(p.distance >= 20.0 && p.distance < 170.0);
        }
    }

    #[test]
    fn test_position_applies_stretch() {
        let field = create_field();
        let particle = Particle {
            angle: 0.0,
            distance: 100.0,
            speed: 0.0,
            radius: 1.0,
            opacity: 0.5,
        };
        let (x, y) = field.position(&particle);
        assert!((x - 480.0).abs() < 1e-9);
        assert!((y - 300.0).abs() < 1e-9);

        let below = Particle {
            angle: std::f64::consts::FRAC_PI_2,
            ..particle
        };
        let (x, y) = field.position(&below);
        assert!((x - 400.0).abs() < 1e-9);
        assert!((y - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_sized_canvas() {
        let mut field = ParticleField::with_seed(FieldConfig::default(), 0.0, 0.0, 1);
        assert_eq!(field.spawn_range(), (20.0, 20.0));

        for _ in 0..400 {
            field.step();
        }
        assert!(field.particles().iter().all(|p| p.distance > 0.0));
    }
}
