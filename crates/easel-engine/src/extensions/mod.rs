// extensions/mod.rs
//
// The math core: easing curves, lazily cached transforms, the transform
// hierarchy, and tweens. None of these depend on Entity/Scene — the scene
// layer builds on them, not the other way round.

pub mod easing;
pub mod hierarchy;
pub mod transform;
pub mod tween;

pub use easing::{EasingCurve, evaluate, evaluate_index, lerp, inverse_lerp, ease, ease_vec3};
pub use hierarchy::{TransformGraph, TransformError};
pub use transform::{Transform, WorldMatrices, Basis};
pub use tween::{TweenState, Tween, TweenId, TweenTarget, TweenLoop};
