use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{
    channel::{Key, Keyframes, Repeat},
    core::{Millis, Vec2},
    ease::Ease,
    error::{KineticaError, KineticaResult},
};

/// Ambient floating-particle field: the overlay's decorative drift layer.
/// Each particle loops a rise-and-fade cycle with randomized size, origin,
/// period and start delay, all drawn once from a seeded rng.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ParticleConfig {
    pub count: usize,
    pub size_min_px: f64,
    pub size_max_px: f64,
    /// Vertical travel per cycle, upward.
    pub rise_px: f64,
    /// Horizontal drift is drawn from [-drift, +drift] per particle.
    pub drift_px: f64,
    pub cycle_min_ms: u64,
    pub cycle_max_ms: u64,
    pub delay_max_ms: u64,
    pub peak_opacity: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 30,
            size_min_px: 1.0,
            size_max_px: 4.0,
            rise_px: 150.0,
            drift_px: 15.0,
            cycle_min_ms: 4000,
            cycle_max_ms: 10_000,
            delay_max_ms: 5000,
            peak_opacity: 0.7,
        }
    }
}

impl ParticleConfig {
    pub fn validate(&self) -> KineticaResult<()> {
        if self.count == 0 {
            return Err(KineticaError::validation("particle count must be > 0"));
        }
        if self.size_min_px > self.size_max_px || self.size_min_px <= 0.0 {
            return Err(KineticaError::validation(
                "particle size range must be positive and ordered",
            ));
        }
        if self.cycle_min_ms == 0 || self.cycle_min_ms > self.cycle_max_ms {
            return Err(KineticaError::validation(
                "particle cycle window must be positive and ordered",
            ));
        }
        if !(0.0..=1.0).contains(&self.peak_opacity) {
            return Err(KineticaError::validation("peak_opacity must be in [0, 1]"));
        }
        if self.rise_px < 0.0 || self.drift_px < 0.0 {
            return Err(KineticaError::validation(
                "rise_px and drift_px must be >= 0",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
struct Particle {
    size_px: f64,
    /// Static origin as fractions of the host container.
    origin_frac: Vec2,
    delay_ms: u64,
    drift: Keyframes<Vec2>,
    opacity: Keyframes<f64>,
}

/// One particle's sampled state.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ParticleFrame {
    pub size_px: f64,
    pub origin_frac: Vec2,
    pub offset_px: Vec2,
    pub opacity: f64,
}

#[derive(Clone, Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new(cfg: ParticleConfig, seed: u64) -> KineticaResult<Self> {
        cfg.validate()?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let particles = (0..cfg.count)
            .map(|_| {
                let cycle = rng.random_range(cfg.cycle_min_ms..=cfg.cycle_max_ms);
                let sway = rng.random_range(-cfg.drift_px..=cfg.drift_px);
                Particle {
                    size_px: rng.random_range(cfg.size_min_px..=cfg.size_max_px),
                    origin_frac: Vec2::new(
                        rng.random_range(0.0..=1.0),
                        rng.random_range(0.0..=1.0),
                    ),
                    delay_ms: if cfg.delay_max_ms == 0 {
                        0
                    } else {
                        rng.random_range(0..=cfg.delay_max_ms)
                    },
                    drift: rise_cycle(cycle, sway, cfg.rise_px),
                    opacity: opacity_cycle(cycle, cfg.peak_opacity),
                }
            })
            .collect();
        Ok(Self { particles })
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn sample(&self, now: Millis) -> Vec<ParticleFrame> {
        self.particles
            .iter()
            .map(|p| {
                // before its delay a particle sits at its first keyframe
                let local = Millis(now.0.saturating_sub(p.delay_ms));
                ParticleFrame {
                    size_px: p.size_px,
                    origin_frac: p.origin_frac,
                    offset_px: p.drift.sample(local),
                    opacity: p.opacity.sample(local),
                }
            })
            .collect()
    }
}

fn rise_cycle(cycle_ms: u64, sway_px: f64, rise_px: f64) -> Keyframes<Vec2> {
    let key = |at_ms, value| Key {
        at_ms,
        value,
        ease: Ease::InOutQuad,
    };
    Keyframes {
        keys: vec![
            key(0, Vec2::ZERO),
            key(cycle_ms / 2, Vec2::new(sway_px, -rise_px)),
            key(cycle_ms, Vec2::ZERO),
        ],
        repeat: Repeat::Loop { delay_ms: 0 },
    }
}

fn opacity_cycle(cycle_ms: u64, peak: f64) -> Keyframes<f64> {
    let key = |at_ms, value| Key {
        at_ms,
        value,
        ease: Ease::InOutQuad,
    };
    Keyframes {
        keys: vec![key(0, 0.0), key(cycle_ms / 2, peak), key(cycle_ms, 0.0)],
        repeat: Repeat::Loop { delay_ms: 0 },
    }
}
