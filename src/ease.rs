#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    /// CSS-style `cubic-bezier(x1, y1, x2, y2)` with implicit endpoints
    /// (0,0) and (1,1). Control x values must lie in [0,1] for the curve to
    /// be a function of time.
    CubicBezier {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
}

impl Ease {
    /// The signature settle curve used across the motion design:
    /// `cubic-bezier(0.43, 0.13, 0.23, 0.96)`.
    pub const SETTLE: Self = Self::CubicBezier {
        x1: 0.43,
        y1: 0.13,
        x2: 0.23,
        y2: 0.96,
    };

    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(t, x1, y1, x2, y2),
        }
    }
}

fn bezier_axis(u: f64, c1: f64, c2: f64) -> f64 {
    let inv = 1.0 - u;
    3.0 * inv * inv * u * c1 + 3.0 * inv * u * u * c2 + u * u * u
}

/// Solve the parametric curve for y at the given x by bisection on u.
/// x(u) is monotonic for x1, x2 in [0,1], which is all CSS allows.
fn cubic_bezier(x: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    let mut u = x;
    for _ in 0..48 {
        let xu = bezier_axis(u, x1, x2);
        if (xu - x).abs() < 1e-9 {
            break;
        }
        if xu < x {
            lo = u;
        } else {
            hi = u;
        }
        u = (lo + hi) / 2.0;
    }
    bezier_axis(u, y1, y2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 8] = [
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
        Ease::SETTLE,
    ];

    #[test]
    fn endpoints_are_stable() {
        for ease in ALL {
            assert_eq!(ease.apply(0.0), 0.0);
            assert_eq!(ease.apply(1.0), 1.0);
        }
    }

    #[test]
    fn monotonic_spot_check() {
        for ease in ALL {
            let a = ease.apply(0.25);
            let b = ease.apply(0.5);
            let c = ease.apply(0.75);
            assert!(a < b);
            assert!(b < c);
        }
    }

    #[test]
    fn input_is_clamped() {
        for ease in ALL {
            assert_eq!(ease.apply(-0.5), 0.0);
            assert_eq!(ease.apply(1.5), 1.0);
        }
    }

    #[test]
    fn bezier_tracks_linear_when_degenerate() {
        // cubic-bezier(1/3, 1/3, 2/3, 2/3) is the identity curve.
        let linearish = Ease::CubicBezier {
            x1: 1.0 / 3.0,
            y1: 1.0 / 3.0,
            x2: 2.0 / 3.0,
            y2: 2.0 / 3.0,
        };
        for t in [0.1, 0.25, 0.5, 0.75, 0.9] {
            assert!((linearish.apply(t) - t).abs() < 1e-6);
        }
    }

    #[test]
    fn settle_curve_starts_fast() {
        // The settle bezier front-loads most of its motion.
        assert!(Ease::SETTLE.apply(0.5) > 0.7);
    }
}
