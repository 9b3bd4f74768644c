// extensions/tween.rs
//
// Tween system — animates one transform property over a fixed duration.
// Works against TransformGraph handles; knows nothing about entities.
//
// Usage:
//   let mut tweens = TweenState::new();
//   tweens.add(transform_id, Tween::position(from, to, 0.5, EasingCurve::EaseOutQuad));
//   tweens.tick(dt, &mut graph);  // Advances all tweens, writes transforms

use std::collections::HashMap;
use glam::Vec3;
use crate::api::types::TransformId;
use super::easing::{EasingCurve, ease, ease_vec3};
use super::hierarchy::TransformGraph;
use super::transform::Transform;

/// What property a tween animates.
#[derive(Debug, Clone, Copy)]
pub enum TweenTarget {
    /// Whole position vector.
    Position { from: Vec3, to: Vec3 },
    PositionX { from: f32, to: f32 },
    PositionY { from: f32, to: f32 },
    PositionZ { from: f32, to: f32 },
    /// Euler angles (pitch, yaw, roll).
    Rotation { from: Vec3, to: Vec3 },
    /// Yaw only.
    Yaw { from: f32, to: f32 },
    Scale { from: Vec3, to: Vec3 },
}

impl TweenTarget {
    fn apply(&self, transform: &mut Transform, t: f32, curve: EasingCurve) {
        match *self {
            TweenTarget::Position { from, to } => {
                transform.set_position(ease_vec3(from, to, t, curve));
            }
            TweenTarget::PositionX { from, to } => {
                let mut p = transform.position();
                p.x = ease(from, to, t, curve);
                transform.set_position(p);
            }
            TweenTarget::PositionY { from, to } => {
                let mut p = transform.position();
                p.y = ease(from, to, t, curve);
                transform.set_position(p);
            }
            TweenTarget::PositionZ { from, to } => {
                let mut p = transform.position();
                p.z = ease(from, to, t, curve);
                transform.set_position(p);
            }
            TweenTarget::Rotation { from, to } => {
                transform.set_euler_rotation(ease_vec3(from, to, t, curve));
            }
            TweenTarget::Yaw { from, to } => {
                let mut r = transform.euler_rotation();
                r.y = ease(from, to, t, curve);
                transform.set_euler_rotation(r);
            }
            TweenTarget::Scale { from, to } => {
                transform.set_scale(ease_vec3(from, to, t, curve));
            }
        }
    }
}

/// What happens when a tween completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenLoop {
    /// Stop and remove the tween.
    #[default]
    Once,
    /// Restart from the beginning.
    Loop,
    /// Reverse direction (ping-pong).
    PingPong,
}

/// A single tween animation.
#[derive(Debug, Clone)]
pub struct Tween {
    pub target: TweenTarget,
    /// Duration in seconds.
    pub duration: f32,
    pub elapsed: f32,
    pub curve: EasingCurve,
    pub loop_mode: TweenLoop,
    /// Whether currently playing (can be paused).
    pub playing: bool,
    /// For ping-pong: current direction (true = forward).
    forward: bool,
}

impl Tween {
    pub fn new(target: TweenTarget, duration: f32, curve: EasingCurve) -> Self {
        Self {
            target,
            duration,
            elapsed: 0.0,
            curve,
            loop_mode: TweenLoop::Once,
            playing: true,
            forward: true,
        }
    }

    pub fn position(from: Vec3, to: Vec3, duration: f32, curve: EasingCurve) -> Self {
        Self::new(TweenTarget::Position { from, to }, duration, curve)
    }

    pub fn rotation(from: Vec3, to: Vec3, duration: f32, curve: EasingCurve) -> Self {
        Self::new(TweenTarget::Rotation { from, to }, duration, curve)
    }

    pub fn scale(from: Vec3, to: Vec3, duration: f32, curve: EasingCurve) -> Self {
        Self::new(TweenTarget::Scale { from, to }, duration, curve)
    }

    pub fn scale_uniform(from: f32, to: f32, duration: f32, curve: EasingCurve) -> Self {
        Self::scale(Vec3::splat(from), Vec3::splat(to), duration, curve)
    }

    // -- Builder methods --

    pub fn with_loop(mut self, mode: TweenLoop) -> Self {
        self.loop_mode = mode;
        self
    }

    pub fn paused(mut self) -> Self {
        self.playing = false;
        self
    }

    /// Normalized progress [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Whether the tween has completed (for Once mode).
    pub fn is_complete(&self) -> bool {
        self.loop_mode == TweenLoop::Once && self.elapsed >= self.duration
    }
}

/// Handle to a tween for later reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(pub u32);

/// Manages all active tweens.
#[derive(Debug, Default)]
pub struct TweenState {
    tweens: HashMap<TweenId, (TransformId, Tween)>,
    next_id: u32,
}

impl TweenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tween for a transform. Returns a handle for later control.
    pub fn add(&mut self, transform: TransformId, tween: Tween) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.insert(id, (transform, tween));
        id
    }

    pub fn remove(&mut self, id: TweenId) -> bool {
        self.tweens.remove(&id).is_some()
    }

    /// Remove all tweens driving a transform.
    pub fn remove_transform(&mut self, transform: TransformId) {
        self.tweens.retain(|_, (t, _)| *t != transform);
    }

    pub fn pause(&mut self, id: TweenId) {
        if let Some((_, tween)) = self.tweens.get_mut(&id) {
            tween.playing = false;
        }
    }

    pub fn resume(&mut self, id: TweenId) {
        if let Some((_, tween)) = self.tweens.get_mut(&id) {
            tween.playing = true;
        }
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.get(&id).map(|(_, t)| t)
    }

    /// Advance all tweens and write their values into the graph.
    /// Returns the number of tweens that completed this tick.
    pub fn tick(&mut self, dt: f32, graph: &mut TransformGraph) -> usize {
        let mut completed = Vec::new();

        for (&id, (transform_id, tween)) in self.tweens.iter_mut() {
            if !tween.playing {
                continue;
            }

            tween.elapsed += dt;

            let raw_t = if tween.duration > 0.0 {
                tween.elapsed / tween.duration
            } else {
                1.0
            };

            let t = if tween.forward {
                raw_t.clamp(0.0, 1.0)
            } else {
                (1.0 - raw_t).clamp(0.0, 1.0)
            };

            match graph.get_mut(*transform_id) {
                Some(transform) => tween.target.apply(transform, t, tween.curve),
                None => {
                    // Target is gone; nothing left to animate.
                    log::debug!("tween {} dropped: transform {} missing", id.0, transform_id.0);
                    completed.push(id);
                    continue;
                }
            }

            if tween.elapsed >= tween.duration {
                // Carry the overshoot into the next cycle.
                let wrapped = if tween.duration > 0.0 {
                    tween.elapsed % tween.duration
                } else {
                    0.0
                };
                match tween.loop_mode {
                    TweenLoop::Once => completed.push(id),
                    TweenLoop::Loop => tween.elapsed = wrapped,
                    TweenLoop::PingPong => {
                        tween.elapsed = wrapped;
                        tween.forward = !tween.forward;
                    }
                }
            }
        }

        let count = completed.len();
        for id in completed {
            self.tweens.remove(&id);
        }

        count
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
    }
}
