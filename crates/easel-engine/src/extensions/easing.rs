// extensions/easing.rs
//
// Pure easing curves for animation timing.
// No dependencies on Entity/Scene — just math.
//
// Inputs are NOT clamped: callers may feed values outside [0, 1]
// (the scene driver does, when it phase-shifts a channel).

use std::f32::consts::PI;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Default overshoot for the Back family.
pub const BACK_OVERSHOOT: f32 = 1.70158;
/// Default angular constant for `EaseInElastic` / `EaseOutElastic`.
pub const ELASTIC_PERIOD: f32 = (2.0 * PI) / 3.0;
/// Default angular constant for `EaseInOutElastic`.
pub const ELASTIC_IN_OUT_PERIOD: f32 = (2.0 * PI) / 4.5;
/// Bounce parabola steepness.
pub const BOUNCE_N1: f32 = 7.5625;
/// Bounce interval divisor.
pub const BOUNCE_D1: f32 = 2.75;

/// Named easing curve. Discriminants are the stable selector indices
/// used by `from_index` / `evaluate_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum EasingCurve {
    EaseInSine = 0,
    EaseOutSine = 1,
    EaseInOutSine = 2,
    EaseInQuad = 3,
    EaseOutQuad = 4,
    EaseInOutQuad = 5,
    EaseInCubic = 6,
    EaseOutCubic = 7,
    EaseInOutCubic = 8,
    EaseInQuart = 9,
    EaseOutQuart = 10,
    EaseInOutQuart = 11,
    EaseInQuint = 12,
    EaseOutQuint = 13,
    EaseInOutQuint = 14,
    /// Exponential. Exactly 0 at x = 0.
    EaseInExpo = 15,
    /// Exponential. Exactly 1 at x = 1.
    EaseOutExpo = 16,
    EaseInOutExpo = 17,
    EaseInCirc = 18,
    EaseOutCirc = 19,
    EaseInOutCirc = 20,
    /// Pulls back below 0 before heading to 1.
    EaseInBack = 21,
    /// Overshoots past 1, then settles.
    EaseOutBack = 22,
    EaseInOutBack = 23,
    /// Spring wind-up.
    EaseInElastic = 24,
    /// Spring release.
    EaseOutElastic = 25,
    EaseInOutElastic = 26,
    EaseInBounce = 27,
    /// Ball dropped on the floor.
    EaseOutBounce = 28,
    EaseInOutBounce = 29,
}

impl EasingCurve {
    /// Every curve, in selector order.
    pub const ALL: [EasingCurve; 30] = [
        EasingCurve::EaseInSine,
        EasingCurve::EaseOutSine,
        EasingCurve::EaseInOutSine,
        EasingCurve::EaseInQuad,
        EasingCurve::EaseOutQuad,
        EasingCurve::EaseInOutQuad,
        EasingCurve::EaseInCubic,
        EasingCurve::EaseOutCubic,
        EasingCurve::EaseInOutCubic,
        EasingCurve::EaseInQuart,
        EasingCurve::EaseOutQuart,
        EasingCurve::EaseInOutQuart,
        EasingCurve::EaseInQuint,
        EasingCurve::EaseOutQuint,
        EasingCurve::EaseInOutQuint,
        EasingCurve::EaseInExpo,
        EasingCurve::EaseOutExpo,
        EasingCurve::EaseInOutExpo,
        EasingCurve::EaseInCirc,
        EasingCurve::EaseOutCirc,
        EasingCurve::EaseInOutCirc,
        EasingCurve::EaseInBack,
        EasingCurve::EaseOutBack,
        EasingCurve::EaseInOutBack,
        EasingCurve::EaseInElastic,
        EasingCurve::EaseOutElastic,
        EasingCurve::EaseInOutElastic,
        EasingCurve::EaseInBounce,
        EasingCurve::EaseOutBounce,
        EasingCurve::EaseInOutBounce,
    ];

    /// Look up a curve by its selector index.
    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Selector index of this curve.
    pub fn index(self) -> i32 {
        self as i32
    }

    /// Whether this is one of the symmetric in-out curves.
    pub fn is_in_out(self) -> bool {
        self.index() % 3 == 2
    }

    /// Map normalized progress `x` to eased progress.
    ///
    /// Conventionally `x` is in [0, 1]. Back and Elastic curves leave
    /// [0, 1] in the interior but still hit 0 and 1 at the endpoints.
    #[inline]
    pub fn evaluate(self, x: f32) -> f32 {
        match self {
            // Sine
            EasingCurve::EaseInSine => 1.0 - (x * PI / 2.0).cos(),
            EasingCurve::EaseOutSine => (x * PI / 2.0).sin(),
            EasingCurve::EaseInOutSine => -((PI * x).cos() - 1.0) / 2.0,

            // Quadratic
            EasingCurve::EaseInQuad => x * x,
            EasingCurve::EaseOutQuad => 1.0 - (1.0 - x) * (1.0 - x),
            EasingCurve::EaseInOutQuad => {
                if x < 0.5 {
                    2.0 * x * x
                } else {
                    1.0 - (-2.0 * x + 2.0).powi(2) / 2.0
                }
            }

            // Cubic
            EasingCurve::EaseInCubic => x * x * x,
            EasingCurve::EaseOutCubic => 1.0 - (1.0 - x).powi(3),
            EasingCurve::EaseInOutCubic => {
                if x < 0.5 {
                    4.0 * x * x * x
                } else {
                    1.0 - (-2.0 * x + 2.0).powi(3) / 2.0
                }
            }

            // Quartic
            EasingCurve::EaseInQuart => x * x * x * x,
            EasingCurve::EaseOutQuart => 1.0 - (1.0 - x).powi(4),
            EasingCurve::EaseInOutQuart => {
                if x < 0.5 {
                    8.0 * x * x * x * x
                } else {
                    1.0 - (-2.0 * x + 2.0).powi(4) / 2.0
                }
            }

            // Quintic
            EasingCurve::EaseInQuint => x * x * x * x * x,
            EasingCurve::EaseOutQuint => 1.0 - (1.0 - x).powi(5),
            EasingCurve::EaseInOutQuint => {
                if x < 0.5 {
                    16.0 * x * x * x * x * x
                } else {
                    1.0 - (-2.0 * x + 2.0).powi(5) / 2.0
                }
            }

            // Exponential
            EasingCurve::EaseInExpo => {
                if x == 0.0 { 0.0 } else { 2.0_f32.powf(10.0 * x - 10.0) }
            }
            EasingCurve::EaseOutExpo => {
                if x == 1.0 { 1.0 } else { 1.0 - 2.0_f32.powf(-10.0 * x) }
            }
            EasingCurve::EaseInOutExpo => {
                if x == 0.0 {
                    0.0
                } else if x == 1.0 {
                    1.0
                } else if x < 0.5 {
                    2.0_f32.powf(20.0 * x - 10.0) / 2.0
                } else {
                    (2.0 - 2.0_f32.powf(-20.0 * x + 10.0)) / 2.0
                }
            }

            // Circular
            EasingCurve::EaseInCirc => 1.0 - (1.0 - x * x).sqrt(),
            EasingCurve::EaseOutCirc => (1.0 - (x - 1.0).powi(2)).sqrt(),
            EasingCurve::EaseInOutCirc => {
                if x < 0.5 {
                    (1.0 - (1.0 - (2.0 * x).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * x + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }

            // Back (overshoot)
            EasingCurve::EaseInBack => back_in_with(x, BACK_OVERSHOOT),
            EasingCurve::EaseOutBack => back_out_with(x, BACK_OVERSHOOT),
            EasingCurve::EaseInOutBack => back_in_out_with(x, BACK_OVERSHOOT),

            // Elastic
            EasingCurve::EaseInElastic => elastic_in_with(x, ELASTIC_PERIOD),
            EasingCurve::EaseOutElastic => elastic_out_with(x, ELASTIC_PERIOD),
            EasingCurve::EaseInOutElastic => elastic_in_out_with(x, ELASTIC_IN_OUT_PERIOD),

            // Bounce
            EasingCurve::EaseInBounce => 1.0 - bounce_out(1.0 - x),
            EasingCurve::EaseOutBounce => bounce_out(x),
            EasingCurve::EaseInOutBounce => {
                if x < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * x)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * x - 1.0)) / 2.0
                }
            }
        }
    }
}

impl TryFrom<i32> for EasingCurve {
    type Error = i32;

    fn try_from(index: i32) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(index)
    }
}

/// Evaluate `curve` at `x`.
#[inline]
pub fn evaluate(curve: EasingCurve, x: f32) -> f32 {
    curve.evaluate(x)
}

/// Evaluate a curve given its raw selector index.
///
/// An unrecognized selector yields `1.0` ("animation finished") rather than
/// an error, so stale selectors coming from data files degrade to a static pose.
#[inline]
pub fn evaluate_index(selector: i32, x: f32) -> f32 {
    match EasingCurve::from_index(selector) {
        Some(curve) => curve.evaluate(x),
        None => 1.0,
    }
}

// ── Parameterized forms ──────────────────────────────────────────────────

/// `EaseInBack` with a custom overshoot `c1`.
#[inline]
pub fn back_in_with(x: f32, c1: f32) -> f32 {
    let c3 = c1 + 1.0;
    c3 * x * x * x - c1 * x * x
}

/// `EaseOutBack` with a custom overshoot `c1`.
#[inline]
pub fn back_out_with(x: f32, c1: f32) -> f32 {
    let c3 = c1 + 1.0;
    1.0 + c3 * (x - 1.0).powi(3) + c1 * (x - 1.0).powi(2)
}

/// `EaseInOutBack` with a custom overshoot `c1`.
#[inline]
pub fn back_in_out_with(x: f32, c1: f32) -> f32 {
    let c2 = c1 * 1.525;
    if x < 0.5 {
        (2.0 * x).powi(2) * ((c2 + 1.0) * 2.0 * x - c2) / 2.0
    } else {
        ((2.0 * x - 2.0).powi(2) * ((c2 + 1.0) * (x * 2.0 - 2.0) + c2) + 2.0) / 2.0
    }
}

/// `EaseInElastic` with a custom angular constant.
#[inline]
pub fn elastic_in_with(x: f32, c4: f32) -> f32 {
    if x == 0.0 {
        0.0
    } else if x == 1.0 {
        1.0
    } else {
        -2.0_f32.powf(10.0 * x - 10.0) * ((x * 10.0 - 10.75) * c4).sin()
    }
}

/// `EaseOutElastic` with a custom angular constant.
#[inline]
pub fn elastic_out_with(x: f32, c4: f32) -> f32 {
    if x == 0.0 {
        0.0
    } else if x == 1.0 {
        1.0
    } else {
        2.0_f32.powf(-10.0 * x) * ((x * 10.0 - 0.75) * c4).sin() + 1.0
    }
}

/// `EaseInOutElastic` with a custom angular constant.
#[inline]
pub fn elastic_in_out_with(x: f32, c5: f32) -> f32 {
    if x == 0.0 {
        0.0
    } else if x == 1.0 {
        1.0
    } else if x < 0.5 {
        -(2.0_f32.powf(20.0 * x - 10.0) * ((20.0 * x - 11.125) * c5).sin()) / 2.0
    } else {
        (2.0_f32.powf(-20.0 * x + 10.0) * ((20.0 * x - 11.125) * c5).sin()) / 2.0 + 1.0
    }
}

/// `EaseOutBounce` with custom steepness and interval divisor.
#[inline]
pub fn bounce_out_with(x: f32, n1: f32, d1: f32) -> f32 {
    if x < 1.0 / d1 {
        n1 * x * x
    } else if x < 2.0 / d1 {
        let x = x - 1.5 / d1;
        n1 * x * x + 0.75
    } else if x < 2.5 / d1 {
        let x = x - 2.25 / d1;
        n1 * x * x + 0.9375
    } else {
        let x = x - 2.625 / d1;
        n1 * x * x + 0.984375
    }
}

#[inline]
fn bounce_out(x: f32) -> f32 {
    bounce_out_with(x, BOUNCE_N1, BOUNCE_D1)
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Where `v` sits between `a` and `b`, as a fraction. Not clamped.
#[inline]
pub fn inverse_lerp(a: f32, b: f32, v: f32) -> f32 {
    (v - a) / (b - a)
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, curve: EasingCurve) -> f32 {
    lerp(a, b, curve.evaluate(t))
}

/// Interpolate Vec3 with easing.
#[inline]
pub fn ease_vec3(a: Vec3, b: Vec3, t: f32, curve: EasingCurve) -> Vec3 {
    a.lerp(b, curve.evaluate(t))
}
