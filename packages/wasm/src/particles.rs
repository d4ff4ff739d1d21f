//! Drifting dust particles.
//!
//! Particles drift rightwards, age by one per frame, and are recycled at the
//! left edge once they leave the viewport by more than the configured margins.

use rand::Rng;

use crate::config::ParticleConfig;
use crate::viewport::Viewport;

/// One dust mote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    /// Frames since spawn (or a random head start), drives the alpha pulse.
    pub life: f32,
}

impl Particle {
    /// Whether the particle has left the viewport past its exit margins.
    #[inline]
    pub fn has_exited(&self, config: &ParticleConfig, viewport: &Viewport) -> bool {
        self.x > viewport.width + config.exit.right
            || self.y < -config.exit.top
            || self.y > viewport.height + config.exit.bottom
    }
}

/// The particle list of one animation instance.
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Create an empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all particles with `config.count` fresh ones spread over the
    /// viewport.
    pub fn populate<R: Rng + ?Sized>(
        &mut self,
        config: &ParticleConfig,
        viewport: &Viewport,
        rng: &mut R,
    ) {
        let spawn_y = config.spawn_y.scaled(viewport.height);
        self.particles.clear();
        self.particles.reserve(config.count);
        for _ in 0..config.count {
            self.particles.push(Particle {
                x: rng.r#gen::<f32>() * viewport.width,
                y: spawn_y.sample(rng),
                vx: config.speed_x.sample(rng),
                vy: config.speed_y.sample(rng),
                radius: config.radius.sample(rng),
                life: config.initial_life.sample(rng),
            });
        }
    }

    /// Advance every particle by one frame.
    ///
    /// Returns how many particles were recycled this frame.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        config: &ParticleConfig,
        viewport: &Viewport,
        rng: &mut R,
    ) -> usize {
        let spawn_y = config.spawn_y.scaled(viewport.height);
        let mut recycled = 0;
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            p.life += 1.0;

            if p.has_exited(config, viewport) {
                p.x = config.reentry_x;
                p.y = spawn_y.sample(rng);
                p.vx = config.speed_x.sample(rng);
                p.vy = config.speed_y.sample(rng);
                p.radius = config.radius.sample(rng);
                p.life = 0.0;
                recycled += 1;
            }
        }
        recycled
    }

    /// All particles in spawn order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// True when the field holds no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Remove every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

/// Opacity of a particle of the given age: a slow sine twinkle.
#[inline]
pub fn particle_alpha(life: f32, config: &ParticleConfig) -> f32 {
    let a = config.alpha_base + config.alpha_amplitude * (life * config.alpha_frequency).sin();
    a.clamp(0.0, 1.0)
}
