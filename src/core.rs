use crate::error::{KineticaError, KineticaResult};

pub use kurbo::{Point, Rect, Vec2};

/// Simulated-clock instant in milliseconds since the owning instance mounted.
///
/// Nothing in this crate reads wall-clock time; the embedding layer advances
/// every engine explicitly with `advance_to`.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Self = Self(0);

    pub fn saturating_add(self, delta_ms: u64) -> Self {
        Self(self.0.saturating_add(delta_ms))
    }

    pub fn saturating_since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1000.0
    }
}

/// Straight-alpha color, the form CSS style values take.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64, // 0..1
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r,
            g,
            b,
            a: a.clamp(0.0, 1.0),
        }
    }

    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0.0)
    }

    /// CSS `rgba(..)` rendering, alpha trimmed to three decimals.
    pub fn to_css(self) -> String {
        let a = (self.a * 1000.0).round() / 1000.0;
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, a)
    }
}

/// Measured bounding box of a stage container. Source of truth for the
/// coordinate ranges the placement engine draws from.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StageSize {
    pub width: f64,
    pub height: f64,
}

impl StageSize {
    pub fn new(width: f64, height: f64) -> KineticaResult<Self> {
        if !width.is_finite() || !height.is_finite() {
            return Err(KineticaError::validation(
                "StageSize dimensions must be finite",
            ));
        }
        if width < 0.0 || height < 0.0 {
            return Err(KineticaError::validation(
                "StageSize dimensions must be >= 0",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn min_dim(self) -> f64 {
        self.width.min(self.height)
    }

    pub fn center(self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn is_empty(self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}
