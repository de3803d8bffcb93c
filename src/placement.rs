use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{
    channel::{Channel, Key, Keyframes, LayeredChannel, Repeat, Tween},
    core::{Millis, Point, StageSize, Vec2},
    ease::Ease,
    error::{KineticaError, KineticaResult},
    schedule::{Scheduler, TaskId},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TokenShape {
    Circle,
    Square,
    Triangle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LayoutMode {
    Scatter,
    Stack,
}

/// Constructor-time tuning for the placement engine. Defaults are the values
/// the homepage shapes ship with.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PlacementConfig {
    /// Scatter interior margin as a fraction of the shorter stage dimension.
    pub padding_fraction: f64,
    /// Scatter rotation is drawn from [-half, +half] degrees.
    pub rotation_half_range_deg: f64,
    pub scale_min: f64,
    pub scale_max: f64,
    pub scatter_z_min: i32,
    pub scatter_z_max: i32,
    /// Vertical stack spacing as a fraction of the shorter stage dimension.
    pub stack_offset_fraction: f64,
    pub stack_z_base: i32,
    /// Probability that a retarget tick picks the stack layout. Low by
    /// design; the ambient animation should mostly scatter.
    pub stack_probability: f64,
    pub retarget_min_ms: u64,
    pub retarget_max_ms: u64,
    /// Duration of the tween toward each new target.
    pub tween_ms: u64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            padding_fraction: 0.15,
            rotation_half_range_deg: 25.0,
            scale_min: 0.95,
            scale_max: 1.15,
            scatter_z_min: 1,
            scatter_z_max: 9,
            stack_offset_fraction: 0.12,
            stack_z_base: 11,
            stack_probability: 0.35,
            retarget_min_ms: 4000,
            retarget_max_ms: 8000,
            tween_ms: 900,
        }
    }
}

impl PlacementConfig {
    pub fn validate(&self) -> KineticaResult<()> {
        if !(0.0..0.5).contains(&self.padding_fraction) {
            return Err(KineticaError::validation(
                "padding_fraction must be in [0, 0.5)",
            ));
        }
        if self.scale_min > self.scale_max || self.scale_min <= 0.0 {
            return Err(KineticaError::validation(
                "scale range must be positive and ordered",
            ));
        }
        if self.scatter_z_min > self.scatter_z_max {
            return Err(KineticaError::validation("scatter z range must be ordered"));
        }
        if !(0.0..=1.0).contains(&self.stack_probability) {
            return Err(KineticaError::validation(
                "stack_probability must be in [0, 1]",
            ));
        }
        if self.retarget_min_ms == 0 || self.retarget_min_ms > self.retarget_max_ms {
            return Err(KineticaError::validation(
                "retarget window must be positive and ordered",
            ));
        }
        if self.rotation_half_range_deg < 0.0 {
            return Err(KineticaError::validation(
                "rotation_half_range_deg must be >= 0",
            ));
        }
        Ok(())
    }
}

/// Where a token is headed: the base target, before any oscillation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TokenTarget {
    pub position: Vec2,
    pub rotation_deg: f64,
    pub scale: f64,
    pub z_index: i32,
}

/// A token's full transform at one instant, oscillation included.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TokenTransform {
    pub shape: TokenShape,
    pub position: Point,
    pub rotation_deg: f64,
    pub scale: f64,
    pub z_index: i32,
}

struct TokenState {
    shape: TokenShape,
    // retarget ticks rewrite `base`; the looping `offset` is never touched,
    // so motion stays continuous across mode switches
    position: LayeredChannel<Vec2>,
    rotation: LayeredChannel<f64>,
    scale_base: Channel<f64>,
    scale_breathe: Channel<f64>,
    target: TokenTarget,
}

/// Procedurally places a small fixed set of decorative tokens on a measured
/// stage, re-targeting them on a jittered interval between a randomized
/// scatter layout and a centered vertical stack.
pub struct PlacementEngine {
    cfg: PlacementConfig,
    rng: SmallRng,
    scheduler: Scheduler,
    stage: Option<StageSize>,
    mode: LayoutMode,
    tokens: Vec<TokenState>,
    retarget_task: Option<TaskId>,
}

impl std::fmt::Debug for PlacementEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacementEngine")
            .field("stage", &self.stage)
            .field("mode", &self.mode)
            .field("tokens", &self.tokens.len())
            .finish_non_exhaustive()
    }
}

impl PlacementEngine {
    pub fn new(cfg: PlacementConfig, shapes: Vec<TokenShape>, seed: u64) -> KineticaResult<Self> {
        cfg.validate()?;
        if shapes.is_empty() {
            return Err(KineticaError::validation(
                "PlacementEngine needs at least one token",
            ));
        }
        let tokens = shapes
            .iter()
            .enumerate()
            .map(|(i, &shape)| TokenState {
                shape,
                position: LayeredChannel {
                    base: Channel::Constant(Vec2::ZERO),
                    offset: Channel::Keyframes(wobble(wobble_amplitude(shape))),
                },
                rotation: LayeredChannel {
                    base: Channel::Constant(0.0),
                    offset: rotation_jitter(shape),
                },
                scale_base: Channel::Constant(1.0),
                scale_breathe: scale_breathing(shape),
                target: TokenTarget {
                    position: Vec2::ZERO,
                    rotation_deg: 0.0,
                    scale: 1.0,
                    z_index: cfg.stack_z_base + i as i32,
                },
            })
            .collect();
        Ok(Self {
            cfg,
            rng: SmallRng::seed_from_u64(seed),
            scheduler: Scheduler::new(),
            stage: None,
            mode: LayoutMode::Scatter,
            tokens,
            retarget_task: None,
        })
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn stage(&self) -> Option<StageSize> {
        self.stage
    }

    /// Record a (re)measured stage. Targets are recomputed immediately with
    /// the fresh dimensions, so no later tick can read stale ones. The first
    /// measurement also starts the retarget loop.
    pub fn measure(&mut self, size: StageSize) {
        let first = self.stage.is_none();
        if !first && self.stage == Some(size) {
            return;
        }
        self.stage = Some(size);
        let now = self.scheduler.now();
        self.retarget(now);
        if first {
            self.schedule_next_tick();
        }
        tracing::debug!(w = size.width, h = size.height, "stage measured");
    }

    /// Drive the retarget timer. Each due tick stochastically picks the next
    /// layout mode, re-targets every token in the same tick, and schedules
    /// the next tick after a fresh jittered delay.
    pub fn advance_to(&mut self, now: Millis) {
        loop {
            let fired = self.scheduler.advance_to(now);
            if fired.is_empty() {
                return;
            }
            for id in fired {
                if self.retarget_task == Some(id) {
                    self.retarget_task = None;
                    let tick_at = self.scheduler.now();
                    self.pick_mode();
                    self.retarget(tick_at);
                    self.schedule_next_tick();
                }
            }
        }
    }

    /// Immediate user-driven retarget (the stage responds to clicks the same
    /// way a timer tick does), resetting the jittered timer.
    pub fn poke(&mut self, now: Millis) {
        self.scheduler.advance_to(now);
        if let Some(id) = self.retarget_task.take() {
            self.scheduler.cancel(id);
        }
        self.pick_mode();
        self.retarget(now);
        self.schedule_next_tick();
    }

    /// Cancel the retarget loop. Sampling still works; nothing re-targets.
    pub fn cancel(&mut self) {
        self.scheduler.cancel_all();
        self.retarget_task = None;
    }

    /// Current base targets, one per token, in token order.
    pub fn targets(&self) -> Vec<TokenTarget> {
        self.tokens.iter().map(|t| t.target).collect()
    }

    /// Sample every token: tweened base plus the continuous oscillation,
    /// summed at read time.
    pub fn sample(&self, now: Millis) -> Vec<TokenTransform> {
        self.tokens
            .iter()
            .map(|t| {
                let p = t.position.sample(now);
                TokenTransform {
                    shape: t.shape,
                    position: Point::new(p.x, p.y),
                    rotation_deg: t.rotation.sample(now),
                    scale: t.scale_base.sample(now) * t.scale_breathe.sample(now),
                    z_index: t.target.z_index,
                }
            })
            .collect()
    }

    fn pick_mode(&mut self) {
        self.mode = if self.rng.random_bool(self.cfg.stack_probability) {
            LayoutMode::Stack
        } else {
            LayoutMode::Scatter
        };
    }

    fn schedule_next_tick(&mut self) {
        let delay = self
            .rng
            .random_range(self.cfg.retarget_min_ms..=self.cfg.retarget_max_ms);
        self.retarget_task = Some(self.scheduler.schedule_after(delay));
    }

    /// Re-target all tokens simultaneously; tokens never straddle two modes.
    /// Only the base tweens are replaced — each token's oscillation channel
    /// keeps its own clock, so there is no snap beyond the tween itself.
    fn retarget(&mut self, now: Millis) {
        // Unmeasured stages stay at the degenerate origin stack; spec'd as
        // "safe defaults before first layout pass".
        let Some(stage) = self.stage else {
            return;
        };
        let n = self.tokens.len();
        for i in 0..n {
            let target = match self.mode {
                LayoutMode::Scatter => self.scatter_target(stage),
                LayoutMode::Stack => stack_target(&self.cfg, stage, i, n),
            };
            let token = &mut self.tokens[i];
            token.position.base = Channel::Tween(Tween {
                from: token.position.base.sample(now),
                to: target.position,
                start: now,
                duration_ms: self.cfg.tween_ms,
                ease: Ease::InOutQuad,
            });
            token.rotation.base = Channel::Tween(Tween {
                from: token.rotation.base.sample(now),
                to: target.rotation_deg,
                start: now,
                duration_ms: self.cfg.tween_ms,
                ease: Ease::InOutQuad,
            });
            token.scale_base = Channel::Tween(Tween {
                from: token.scale_base.sample(now),
                to: target.scale,
                start: now,
                duration_ms: self.cfg.tween_ms,
                ease: Ease::InOutQuad,
            });
            token.target = target;
        }
        tracing::debug!(mode = ?self.mode, at_ms = now.0, "tokens retargeted");
    }

    fn scatter_target(&mut self, stage: StageSize) -> TokenTarget {
        let pad = stage.min_dim() * self.cfg.padding_fraction;
        let span_x = (stage.width - pad * 2.0).max(0.0);
        let span_y = (stage.height - pad * 2.0).max(0.0);
        let half = self.cfg.rotation_half_range_deg;
        TokenTarget {
            position: Vec2::new(
                pad + self.rng.random_range(0.0..=1.0) * span_x,
                pad + self.rng.random_range(0.0..=1.0) * span_y,
            ),
            rotation_deg: if half > 0.0 {
                self.rng.random_range(-half..=half)
            } else {
                0.0
            },
            scale: self
                .rng
                .random_range(self.cfg.scale_min..=self.cfg.scale_max),
            z_index: self
                .rng
                .random_range(self.cfg.scatter_z_min..=self.cfg.scatter_z_max),
        }
    }
}

fn stack_target(cfg: &PlacementConfig, stage: StageSize, index: usize, count: usize) -> TokenTarget {
    let center = stage.center();
    let offset =
        (index as f64 - (count as f64 - 1.0) / 2.0) * cfg.stack_offset_fraction * stage.min_dim();
    TokenTarget {
        position: Vec2::new(center.x, center.y + offset),
        rotation_deg: 0.0,
        scale: 1.0,
        z_index: cfg.stack_z_base + index as i32,
    }
}

fn wobble_amplitude(shape: TokenShape) -> f64 {
    match shape {
        TokenShape::Circle => 4.0,
        TokenShape::Square => 5.0,
        TokenShape::Triangle => 6.0,
    }
}

/// The slow drift every token carries: x goes 0, +a, 0, -a, 0 while y
/// mirrors it, over six seconds, forever.
fn wobble(amplitude: f64) -> Keyframes<Vec2> {
    let key = |at_ms, x: f64, y: f64| Key {
        at_ms,
        value: Vec2::new(x, y),
        ease: Ease::InOutQuad,
    };
    Keyframes {
        keys: vec![
            key(0, 0.0, 0.0),
            key(1500, amplitude, -amplitude),
            key(3000, 0.0, 0.0),
            key(4500, -amplitude, amplitude),
            key(6000, 0.0, 0.0),
        ],
        repeat: Repeat::Loop { delay_ms: 0 },
    }
}

fn rotation_jitter(shape: TokenShape) -> Channel<f64> {
    match shape {
        TokenShape::Square => Channel::Keyframes(Keyframes {
            keys: [(0, 0.0), (1333, 5.0), (2666, -5.0), (4000, 0.0)]
                .into_iter()
                .map(|(at_ms, value)| Key {
                    at_ms,
                    value,
                    ease: Ease::InOutQuad,
                })
                .collect(),
            repeat: Repeat::Loop { delay_ms: 0 },
        }),
        _ => Channel::Constant(0.0),
    }
}

fn scale_breathing(shape: TokenShape) -> Channel<f64> {
    let peak = match shape {
        TokenShape::Circle => return Channel::Constant(1.0),
        TokenShape::Square => 1.05,
        TokenShape::Triangle => 1.1,
    };
    Channel::Keyframes(Keyframes {
        keys: [(0, 1.0), (1500, peak), (3000, 1.0)]
            .into_iter()
            .map(|(at_ms, value)| Key {
                at_ms,
                value,
                ease: Ease::InOutQuad,
            })
            .collect(),
        repeat: Repeat::Loop { delay_ms: 0 },
    })
}
