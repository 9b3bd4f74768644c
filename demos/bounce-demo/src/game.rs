/// Bounce demo: three eased blocks swinging over a ground slab.
///
/// Every frame the animator maps `sin(total)` into 0..1 and feeds it through
/// a different curve per block. The camera flies with WASD/QE, drag to look.

use easel_engine::*;
use easel_engine::input::queue::InputEvent;

// ── Handles the host renderer maps to geometry and shading ──────────

const CUBE_MESH: MeshId = MeshId(0);
const SLAB_MESH: MeshId = MeshId(1);

const BLOCK_TINTS: [[f32; 4]; 3] = [
    [0.9, 0.3, 0.2, 1.0],
    [0.2, 0.7, 0.9, 1.0],
    [0.9, 0.8, 0.2, 1.0],
];
const GROUND_TINT: [f32; 4] = [0.5, 0.5, 0.5, 1.0];

// ── Custom event kinds from the UI ──────────────────────────────────

/// Pause or resume the animation.
const CUSTOM_TOGGLE_PAUSE: u32 = 1;
/// Swap the centre block's height curve; `a` carries the curve index.
const CUSTOM_SET_CURVE: u32 = 2;
/// Spin the centre block once around its yaw axis.
const CUSTOM_SPIN: u32 = 3;

const SPIN_SECONDS: f32 = 1.5;

pub struct BounceDemo {
    centre: Option<EntityId>,
}

impl BounceDemo {
    pub fn new() -> Self {
        Self { centre: None }
    }

    fn spawn_block(ctx: &mut EngineContext, tag: &str, x: f32, tint: [f32; 4]) -> EntityId {
        let material = ctx.materials.add(Material::new(tint));
        let id = ctx.spawn_with(tag, Transform::new().with_position((x, 0.0, 0.0)));
        if let Some(entity) = ctx.entity_mut(id) {
            entity.mesh = Some(CUBE_MESH);
            entity.material = material;
        }
        id
    }

    /// One warm point light beside the right block, three coloured
    /// directional fills.
    fn add_lights(ctx: &mut EngineContext) {
        ctx.lights.set_ambient(0.1, 0.1, 0.1);
        let lights = [
            Light::point((5.0, 0.0, 0.0), [1.0, 0.5, 0.0], 5.0, 20.0),
            Light::directional((0.1, -1.0, 0.0), [0.0, 0.5, 0.5], 5.0),
            Light::directional((0.0, 1.0, 0.2), [0.1, 0.8, 0.5], 5.0),
            Light::directional((0.0, -1.0, 0.2), [1.0, 1.0, 1.0], 10.0),
        ];
        for light in lights {
            ctx.lights.add(light.with_spot_falloff(0.3));
        }
    }

    /// Swing between y = -1 and y = 1.
    fn height(curve: EasingCurve) -> EasedChannel {
        EasedChannel::new(Channel::PositionY, curve).with_gain(2.0).with_bias(-1.0)
    }

    fn build_animator(centre: TransformId, right: TransformId, left: TransformId, centre_curve: EasingCurve) -> Animator {
        Animator::new(TimeSource::Oscillate { frequency: 1.0 })
            .with_track(
                AnimationTrack::new(centre)
                    .with_channel(Self::height(centre_curve))
                    .with_channel(EasedChannel::new(Channel::ScaleX, EasingCurve::EaseInOutBounce).with_bias(0.5))
                    .with_channel(EasedChannel::new(Channel::ScaleY, EasingCurve::EaseInOutBounce).with_bias(0.25)),
            )
            .with_track(
                AnimationTrack::new(right)
                    .with_channel(Self::height(EasingCurve::EaseInOutCubic))
                    .with_channel(EasedChannel::new(Channel::ScaleY, EasingCurve::EaseInOutCubic).with_phase(0.5)),
            )
            .with_track(
                AnimationTrack::new(left)
                    .with_channel(Self::height(EasingCurve::EaseInOutElastic))
                    .with_channel(EasedChannel::new(Channel::ScaleY, EasingCurve::EaseInOutElastic).with_bias(0.1)),
            )
    }

    fn set_centre_curve(&self, ctx: &mut EngineContext, index: i32) {
        let Some(curve) = EasingCurve::from_index(index) else {
            log::warn!("bounce-demo: no easing curve with index {}", index);
            return;
        };
        let Some(centre) = self.centre.and_then(|id| ctx.transform_id(id)) else { return };

        for track in ctx.animator.tracks_mut().iter_mut().filter(|t| t.transform == centre) {
            for ch in track.channels.iter_mut().filter(|c| c.channel == Channel::PositionY) {
                ch.curve = curve;
            }
        }
        log::info!("bounce-demo: centre block now uses {:?}", curve);
    }
}

impl Game for BounceDemo {
    fn config(&self) -> GameConfig {
        GameConfig {
            max_instances: 16,
            ..Default::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        let centre = Self::spawn_block(ctx, "centre", 0.0, BLOCK_TINTS[0]);
        let right = Self::spawn_block(ctx, "right", 5.0, BLOCK_TINTS[1]);
        let left = Self::spawn_block(ctx, "left", -5.0, BLOCK_TINTS[2]);

        let ground = ctx.spawn_with(
            "ground",
            Transform::new()
                .with_position((0.0, -3.0, 0.0))
                .with_scale((1000.0, 1.0, 1000.0)),
        );
        let ground_material = ctx.materials.add(Material::new(GROUND_TINT));
        if let Some(entity) = ctx.entity_mut(ground) {
            entity.mesh = Some(SLAB_MESH);
            entity.material = ground_material;
        }

        Self::add_lights(ctx);

        if let [Some(c), Some(r), Some(l)] = [centre, right, left].map(|id| ctx.transform_id(id)) {
            ctx.animator = Self::build_animator(c, r, l, EasingCurve::EaseInBounce);
        }
        self.centre = Some(centre);
    }

    fn update(&mut self, ctx: &mut EngineContext, _frame: &FrameTime, input: &InputState) {
        for event in input.custom_events() {
            if let InputEvent::Custom { kind, a, .. } = *event {
                match kind {
                    CUSTOM_TOGGLE_PAUSE => ctx.animator.playing = !ctx.animator.playing,
                    CUSTOM_SET_CURVE => self.set_centre_curve(ctx, a as i32),
                    CUSTOM_SPIN => {
                        if let Some(t) = self.centre.and_then(|id| ctx.transform_id(id)) {
                            ctx.tweens.remove_transform(t);
                            let spin = Tween::new(
                                TweenTarget::Yaw { from: 0.0, to: std::f32::consts::TAU },
                                SPIN_SECONDS,
                                EasingCurve::EaseInOutBack,
                            );
                            ctx.tweens.add(t, spin);
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}
