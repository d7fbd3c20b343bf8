//! Cosmetic particle pool
//!
//! Particles are visual only: collision and scoring never read them. Both
//! games share this pool; the helicopter spawns in pixel space, the snake
//! in grid space (the renderer scales by cell size).

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

/// Hard cap; oldest particles are evicted when a burst would overflow it
pub const MAX_PARTICLES: usize = 256;

/// Life lost per reference frame
const LIFE_DECAY: f32 = 0.02;

/// A single short-lived visual particle
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life; renderers use this directly as alpha
    pub life: f32,
    pub size: f32,
    pub color: &'static str,
}

/// Parameters for one burst of particles
#[derive(Debug, Clone, Copy)]
pub struct Burst {
    pub count: usize,
    /// Spawn positions jitter uniformly within +/- this offset
    pub jitter: f32,
    /// Velocity components drawn uniformly from +/- this magnitude
    pub speed: f32,
    pub life: f32,
    /// Size drawn uniformly from this range
    pub min_size: f32,
    pub max_size: f32,
    pub color: &'static str,
}

/// Pool of live particles
#[derive(Debug, Default)]
pub struct Particles {
    list: Vec<Particle>,
}

impl Particles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, rng: &mut Pcg32, at: Vec2, burst: Burst) {
        for _ in 0..burst.count {
            if self.list.len() >= MAX_PARTICLES {
                self.list.remove(0);
            }
            let jitter = Vec2::new(
                (rng.random::<f32>() - 0.5) * 2.0 * burst.jitter,
                (rng.random::<f32>() - 0.5) * 2.0 * burst.jitter,
            );
            let vel = Vec2::new(
                (rng.random::<f32>() - 0.5) * 2.0 * burst.speed,
                (rng.random::<f32>() - 0.5) * 2.0 * burst.speed,
            );
            let size = burst.min_size + rng.random::<f32>() * (burst.max_size - burst.min_size);
            self.list.push(Particle {
                pos: at + jitter,
                vel,
                life: burst.life,
                size,
                color: burst.color,
            });
        }
    }

    /// Integrate positions and decay life; expired particles are purged
    pub fn step(&mut self, frames: f32) {
        for p in &mut self.list {
            p.pos += p.vel * frames;
            p.life -= LIFE_DECAY * frames;
        }
        self.list.retain(|p| p.life > 0.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }
}
