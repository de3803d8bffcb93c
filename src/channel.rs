use crate::{
    core::{Millis, Rgba, Vec2},
    ease::Ease,
    error::{KineticaError, KineticaResult},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for f32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        (*a as f64 + ((*b as f64 - *a as f64) * t)) as f32
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for Rgba {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: (a.a + (b.a - a.a) * t).clamp(0.0, 1.0),
        }
    }
}

/// Values a layered channel can sum at read time.
pub trait Additive: Sized {
    fn zero() -> Self;
    fn add(a: &Self, b: &Self) -> Self;
}

impl Additive for f64 {
    fn zero() -> Self {
        0.0
    }
    fn add(a: &Self, b: &Self) -> Self {
        a + b
    }
}

impl Additive for Vec2 {
    fn zero() -> Self {
        Vec2::ZERO
    }
    fn add(a: &Self, b: &Self) -> Self {
        *a + *b
    }
}

/// One eased transition toward a target. Sampling clamps to the endpoints:
/// before `start` the value is `from`, after `start + duration_ms` it is
/// `to`, and a zero duration snaps to the target immediately.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Tween<T> {
    pub from: T,
    pub to: T,
    pub start: Millis,
    pub duration_ms: u64,
    pub ease: Ease,
}

impl<T> Tween<T>
where
    T: Lerp + Clone,
{
    pub fn sample(&self, now: Millis) -> T {
        let elapsed = now.saturating_since(self.start);
        if elapsed >= self.duration_ms {
            return self.to.clone();
        }
        let t = elapsed as f64 / self.duration_ms as f64;
        T::lerp(&self.from, &self.to, self.ease.apply(t))
    }

    pub fn is_done(&self, now: Millis) -> bool {
        now.saturating_since(self.start) >= self.duration_ms
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Repeat {
    None,
    /// Repeat forever; the value holds at the last key for `delay_ms`
    /// between cycles.
    Loop { delay_ms: u64 },
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Key<T> {
    pub at_ms: u64,
    pub value: T,
    pub ease: Ease, // ease applied toward the next key
}

/// Timed keyframes, optionally looping. This is what the continuous
/// oscillations (wobble, breathing, rotation jitter) are built from.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Keyframes<T> {
    pub keys: Vec<Key<T>>, // sorted by at_ms
    pub repeat: Repeat,
}

impl<T> Keyframes<T>
where
    T: Lerp + Clone,
{
    pub fn validate(&self) -> KineticaResult<()> {
        if self.keys.is_empty() {
            return Err(KineticaError::animation(
                "Keyframes must have at least one key",
            ));
        }
        if !self.keys.windows(2).all(|w| w[0].at_ms <= w[1].at_ms) {
            return Err(KineticaError::animation(
                "Keyframes keys must be sorted by at_ms",
            ));
        }
        if let Repeat::Loop { delay_ms } = self.repeat {
            let last = self.keys[self.keys.len() - 1].at_ms;
            if last + delay_ms == 0 {
                return Err(KineticaError::animation(
                    "looping Keyframes must have a period > 0",
                ));
            }
        }
        Ok(())
    }

    pub fn sample(&self, now: Millis) -> T {
        let last_at = self.keys[self.keys.len() - 1].at_ms;
        let local = match self.repeat {
            Repeat::None => now.0,
            Repeat::Loop { delay_ms } => {
                let period = last_at + delay_ms;
                if period == 0 {
                    0
                } else {
                    now.0 % period
                }
            }
        };
        // In the inter-cycle delay the value holds at the last key.
        if local >= last_at {
            return self.keys[self.keys.len() - 1].value.clone();
        }

        let idx = self.keys.partition_point(|k| k.at_ms <= local);
        if idx == 0 {
            return self.keys[0].value.clone();
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let denom = b.at_ms.saturating_sub(a.at_ms);
        if denom == 0 {
            return a.value.clone();
        }

        let t = (local - a.at_ms) as f64 / denom as f64;
        T::lerp(&a.value, &b.value, a.ease.apply(t))
    }
}

/// A named animated output value. Channels are pure: sampling never mutates,
/// and nothing feeds back into the engines that drive them.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub enum Channel<T> {
    Constant(T),
    Tween(Tween<T>),
    Keyframes(Keyframes<T>),
}

impl<T> Channel<T>
where
    T: Lerp + Clone,
{
    pub fn sample(&self, now: Millis) -> T {
        match self {
            Self::Constant(v) => v.clone(),
            Self::Tween(tw) => tw.sample(now),
            Self::Keyframes(kf) => kf.sample(now),
        }
    }

    pub fn validate(&self) -> KineticaResult<()> {
        match self {
            Self::Constant(_) | Self::Tween(_) => Ok(()),
            Self::Keyframes(kf) => kf.validate(),
        }
    }
}

/// Slow base target plus fast offset, summed at read time. The two halves
/// are owned by different update sources (retarget ticks rewrite `base`,
/// the oscillation loop lives in `offset`), so neither can overwrite the
/// other's work.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LayeredChannel<T> {
    pub base: Channel<T>,
    pub offset: Channel<T>,
}

impl<T> LayeredChannel<T>
where
    T: Lerp + Clone + Additive,
{
    pub fn steady(value: T) -> Self {
        Self {
            base: Channel::Constant(value),
            offset: Channel::Constant(T::zero()),
        }
    }

    pub fn sample(&self, now: Millis) -> T {
        T::add(&self.base.sample(now), &self.offset.sample(now))
    }

    pub fn validate(&self) -> KineticaResult<()> {
        self.base.validate()?;
        self.offset.validate()
    }
}
