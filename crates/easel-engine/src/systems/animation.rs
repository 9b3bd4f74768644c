//! Scene animation driver: total time → normalized value → easing curve →
//! absolute transform setter.
//!
//! Every channel is written every frame, so the result depends only on the
//! clock, never on the previous frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::api::types::TransformId;
use crate::core::time::FrameTime;
use crate::extensions::easing::{inverse_lerp, EasingCurve};
use crate::extensions::hierarchy::TransformGraph;
use crate::extensions::transform::Transform;

/// Maps total elapsed time to the normalized value fed to the curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeSource {
    /// `inverse_lerp(-1, 1, sin(total * frequency))`: a smooth 0..1..0 swing.
    Oscillate { frequency: f32 },
    /// Sawtooth ramp 0 → 1 every `period` seconds.
    Loop { period: f32 },
    /// Triangle wave 0 → 1 → 0 over `2 * period` seconds.
    PingPong { period: f32 },
}

impl Default for TimeSource {
    fn default() -> Self {
        TimeSource::Oscillate { frequency: 1.0 }
    }
}

impl TimeSource {
    /// Normalized value at `total` seconds. Non-positive periods yield 0.
    pub fn sample(&self, total: f32) -> f32 {
        match *self {
            TimeSource::Oscillate { frequency } => inverse_lerp(-1.0, 1.0, (total * frequency).sin()),
            TimeSource::Loop { period } => {
                if period <= 0.0 {
                    return 0.0;
                }
                total.rem_euclid(period) / period
            }
            TimeSource::PingPong { period } => {
                if period <= 0.0 {
                    return 0.0;
                }
                let t = (total / period).rem_euclid(2.0);
                if t > 1.0 { 2.0 - t } else { t }
            }
        }
    }
}

/// One scalar property of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    PositionX,
    PositionY,
    PositionZ,
    ScaleX,
    ScaleY,
    ScaleZ,
    Pitch,
    Yaw,
    Roll,
}

impl Channel {
    /// Overwrite this component through the transform's absolute setters,
    /// leaving the other components untouched.
    pub fn write(self, transform: &mut Transform, value: f32) {
        match self {
            Channel::PositionX | Channel::PositionY | Channel::PositionZ => {
                let p = with_component(transform.position(), self.axis(), value);
                transform.set_position(p);
            }
            Channel::ScaleX | Channel::ScaleY | Channel::ScaleZ => {
                let s = with_component(transform.scale(), self.axis(), value);
                transform.set_scale(s);
            }
            Channel::Pitch | Channel::Yaw | Channel::Roll => {
                let r = with_component(transform.euler_rotation(), self.axis(), value);
                transform.set_euler_rotation(r);
            }
        }
    }

    /// Read the current value of this component.
    pub fn read(self, transform: &Transform) -> f32 {
        let v = match self {
            Channel::PositionX | Channel::PositionY | Channel::PositionZ => transform.position(),
            Channel::ScaleX | Channel::ScaleY | Channel::ScaleZ => transform.scale(),
            Channel::Pitch | Channel::Yaw | Channel::Roll => transform.euler_rotation(),
        };
        v[self.axis()]
    }

    fn axis(self) -> usize {
        match self {
            Channel::PositionX | Channel::ScaleX | Channel::Pitch => 0,
            Channel::PositionY | Channel::ScaleY | Channel::Yaw => 1,
            Channel::PositionZ | Channel::ScaleZ | Channel::Roll => 2,
        }
    }
}

fn with_component(mut v: Vec3, axis: usize, value: f32) -> Vec3 {
    v[axis] = value;
    v
}

fn one() -> f32 {
    1.0
}

/// A channel driven by `curve.evaluate(lerp + phase) * gain + bias`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EasedChannel {
    pub channel: Channel,
    pub curve: EasingCurve,
    #[serde(default = "one")]
    pub gain: f32,
    #[serde(default)]
    pub bias: f32,
    /// Added to the normalized value before the curve. The sum is not
    /// clamped.
    #[serde(default)]
    pub phase: f32,
}

impl EasedChannel {
    pub fn new(channel: Channel, curve: EasingCurve) -> Self {
        Self {
            channel,
            curve,
            gain: 1.0,
            bias: 0.0,
            phase: 0.0,
        }
    }

    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    pub fn with_bias(mut self, bias: f32) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    /// Value this channel takes for normalized input `lerp`.
    pub fn value(&self, lerp: f32) -> f32 {
        self.curve.evaluate(lerp + self.phase) * self.gain + self.bias
    }
}

/// All eased channels targeting one transform.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTrack {
    pub transform: TransformId,
    pub channels: Vec<EasedChannel>,
}

impl AnimationTrack {
    pub fn new(transform: TransformId) -> Self {
        Self {
            transform,
            channels: Vec::new(),
        }
    }

    pub fn with_channel(mut self, channel: EasedChannel) -> Self {
        self.channels.push(channel);
        self
    }
}

/// Drives a set of tracks from one time source.
#[derive(Debug, Clone)]
pub struct Animator {
    pub source: TimeSource,
    tracks: Vec<AnimationTrack>,
    /// Stopped animators leave transforms alone.
    pub playing: bool,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(TimeSource::default())
    }
}

impl Animator {
    pub fn new(source: TimeSource) -> Self {
        Self {
            source,
            tracks: Vec::new(),
            playing: true,
        }
    }

    pub fn with_track(mut self, track: AnimationTrack) -> Self {
        self.add_track(track);
        self
    }

    pub fn add_track(&mut self, track: AnimationTrack) {
        self.tracks.push(track);
    }

    /// Drop every track targeting `transform`.
    pub fn remove_transform(&mut self, transform: TransformId) {
        self.tracks.retain(|t| t.transform != transform);
    }

    pub fn tracks(&self) -> &[AnimationTrack] {
        &self.tracks
    }

    pub fn tracks_mut(&mut self) -> &mut [AnimationTrack] {
        &mut self.tracks
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Write every channel for this frame. Returns how many were written.
    /// Tracks whose transform is gone are skipped.
    pub fn update(&self, frame: &FrameTime, graph: &mut TransformGraph) -> usize {
        if !self.playing {
            return 0;
        }

        let lerp = self.source.sample(frame.total);
        log::trace!("frame {} lerp {:.4}", frame.frame_index, lerp);

        let mut written = 0;
        for track in &self.tracks {
            let Some(transform) = graph.get_mut(track.transform) else {
                log::warn!("animation track targets missing transform {:?}", track.transform);
                continue;
            };
            for ch in &track.channels {
                ch.channel.write(transform, ch.value(lerp));
                written += 1;
            }
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-5;

    fn frame(total: f32) -> FrameTime {
        FrameTime { dt: 0.0, total, frame_index: 0 }
    }

    /// The three bouncing entities: an in-bounce centre block, an
    /// in-out-cubic block on the right, an in-out-elastic block on the left.
    fn bounce_scene(graph: &mut TransformGraph) -> (Animator, [TransformId; 3]) {
        let centre = graph.create();
        let right = graph.insert(Transform::new().with_position((5.0, 0.0, 0.0)));
        let left = graph.insert(Transform::new().with_position((-5.0, 0.0, 0.0)));

        let animator = Animator::new(TimeSource::Oscillate { frequency: 1.0 })
            .with_track(
                AnimationTrack::new(centre)
                    .with_channel(EasedChannel::new(Channel::PositionY, EasingCurve::EaseInBounce).with_gain(2.0).with_bias(-1.0))
                    .with_channel(EasedChannel::new(Channel::ScaleX, EasingCurve::EaseInOutBounce).with_bias(0.5))
                    .with_channel(EasedChannel::new(Channel::ScaleY, EasingCurve::EaseInOutBounce).with_bias(0.25)),
            )
            .with_track(
                AnimationTrack::new(right)
                    .with_channel(EasedChannel::new(Channel::PositionY, EasingCurve::EaseInOutCubic).with_gain(2.0).with_bias(-1.0))
                    .with_channel(EasedChannel::new(Channel::ScaleY, EasingCurve::EaseInOutCubic).with_phase(0.5)),
            )
            .with_track(
                AnimationTrack::new(left)
                    .with_channel(EasedChannel::new(Channel::PositionY, EasingCurve::EaseInOutElastic).with_gain(2.0).with_bias(-1.0))
                    .with_channel(EasedChannel::new(Channel::ScaleY, EasingCurve::EaseInOutElastic).with_bias(0.1)),
            );
        (animator, [centre, right, left])
    }

    #[test]
    fn oscillate_maps_sine_to_unit_range() {
        let src = TimeSource::Oscillate { frequency: 1.0 };
        assert!((src.sample(0.0) - 0.5).abs() < EPS);
        assert!((src.sample(FRAC_PI_2) - 1.0).abs() < EPS);
        assert!(src.sample(3.0 * FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn loop_and_ping_pong() {
        let lp = TimeSource::Loop { period: 2.0 };
        assert!((lp.sample(0.5) - 0.25).abs() < EPS);
        assert!((lp.sample(2.5) - 0.25).abs() < EPS);

        let pp = TimeSource::PingPong { period: 1.0 };
        assert!((pp.sample(0.25) - 0.25).abs() < EPS);
        assert!((pp.sample(1.25) - 0.75).abs() < EPS);
        assert!((pp.sample(2.25) - 0.25).abs() < EPS);

        assert_eq!(TimeSource::Loop { period: 0.0 }.sample(3.0), 0.0);
    }

    #[test]
    fn drives_bounce_scene_at_rest_point() {
        let mut graph = TransformGraph::new();
        let (animator, [centre, right, left]) = bounce_scene(&mut graph);

        // sin(0) = 0 → lerp 0.5
        let written = animator.update(&frame(0.0), &mut graph);
        assert_eq!(written, 7);

        let c = graph.get(centre).unwrap();
        let expected_y = EasingCurve::EaseInBounce.evaluate(0.5) * 2.0 - 1.0;
        assert!((c.position().y - expected_y).abs() < EPS);
        let bounce = EasingCurve::EaseInOutBounce.evaluate(0.5);
        assert!(c.scale().abs_diff_eq(Vec3::new(bounce + 0.5, bounce + 0.25, 1.0), EPS));

        let r = graph.get(right).unwrap();
        assert!(r.position().abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), EPS));
        // phase 0.5 pushes the cubic to its end: 1.0
        assert!((r.scale().y - 1.0).abs() < EPS);

        let l = graph.get(left).unwrap();
        assert!((l.position().x + 5.0).abs() < EPS);
        assert!((l.scale().y - (EasingCurve::EaseInOutElastic.evaluate(0.5) + 0.1)).abs() < EPS);
    }

    #[test]
    fn peak_of_swing_lifts_everything() {
        let mut graph = TransformGraph::new();
        let (animator, ids) = bounce_scene(&mut graph);
        animator.update(&frame(FRAC_PI_2), &mut graph);
        for id in ids {
            assert!((graph.get(id).unwrap().position().y - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn writes_are_absolute() {
        let mut graph = TransformGraph::new();
        let (animator, [centre, _, _]) = bounce_scene(&mut graph);
        animator.update(&frame(0.7), &mut graph);
        let first = graph.get(centre).unwrap().position();
        animator.update(&frame(0.7), &mut graph);
        assert_eq!(graph.get(centre).unwrap().position(), first);
    }

    #[test]
    fn missing_transform_is_skipped() {
        let mut graph = TransformGraph::new();
        let (mut animator, [centre, _, _]) = bounce_scene(&mut graph);
        graph.remove(centre);
        assert_eq!(animator.update(&frame(0.0), &mut graph), 4);

        animator.remove_transform(centre);
        assert_eq!(animator.track_count(), 2);
    }

    #[test]
    fn stopped_animator_writes_nothing() {
        let mut graph = TransformGraph::new();
        let (mut animator, _) = bounce_scene(&mut graph);
        animator.playing = false;
        assert_eq!(animator.update(&frame(1.0), &mut graph), 0);
    }

    #[test]
    fn channel_write_touches_one_component() {
        let mut t = Transform::new().with_euler_rotation((0.1, 0.2, 0.3));
        Channel::Yaw.write(&mut t, 1.5);
        assert!(t.euler_rotation().abs_diff_eq(Vec3::new(0.1, 1.5, 0.3), EPS));
        assert!(t.is_matrix_dirty());
        assert_eq!(Channel::Yaw.read(&t), 1.5);
    }

    #[test]
    fn eased_channel_from_json_defaults() {
        let ch: EasedChannel =
            serde_json::from_str(r#"{"channel":"scale_y","curve":"ease_in_out_cubic","phase":0.5}"#).unwrap();
        assert_eq!(ch.channel, Channel::ScaleY);
        assert_eq!(ch.gain, 1.0);
        assert_eq!(ch.bias, 0.0);

        let src: TimeSource = serde_json::from_str(r#"{"kind":"ping_pong","period":2.0}"#).unwrap();
        assert_eq!(src, TimeSource::PingPong { period: 2.0 });
    }
}
