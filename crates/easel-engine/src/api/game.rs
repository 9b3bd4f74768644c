use crate::api::types::{EntityId, TransformId};
use crate::components::entity::Entity;
use crate::core::scene::Scene;
use crate::core::time::{FrameClock, FrameTime};
use crate::extensions::hierarchy::TransformGraph;
use crate::extensions::transform::Transform;
use crate::extensions::tween::TweenState;
use crate::input::queue::InputState;
use crate::renderer::camera::{Camera3D, CameraConfig, CameraUniform};
use crate::renderer::instance::RenderBuffer;
use crate::renderer::material::MaterialTable;
use crate::systems::animation::Animator;
use crate::systems::lighting::LightState;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Maximum number of render instances (default: 512).
    pub max_instances: usize,
    /// Size of the material table (default: 16).
    pub max_materials: usize,
    /// Viewport width in pixels, used for the initial aspect ratio.
    pub viewport_width: f32,
    /// Viewport height in pixels.
    pub viewport_height: f32,
    /// Longest frame delta the clock accepts, in seconds (default: 0.25).
    pub max_dt: f32,
    pub camera: CameraConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_instances: 512,
            max_materials: 16,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            max_dt: FrameClock::DEFAULT_MAX_DT,
            camera: CameraConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn aspect(&self) -> f32 {
        if self.viewport_height > 0.0 {
            self.viewport_width / self.viewport_height
        } else {
            1.0
        }
    }
}

/// The core contract every scene must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Spawn entities, build the hierarchy, set up animation.
    fn init(&mut self, ctx: &mut EngineContext);

    /// Per-frame logic. Runs after the camera has consumed input and before
    /// the animator and tweens write transforms.
    fn update(&mut self, ctx: &mut EngineContext, frame: &FrameTime, input: &InputState);

    /// Optional read-only render pass for custom render commands.
    fn render(&self, _ctx: &mut RenderContext) {}
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub transforms: TransformGraph,
    pub tweens: TweenState,
    pub animator: Animator,
    pub camera: Camera3D,
    pub lights: LightState,
    pub materials: MaterialTable,
    next_id: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::from_config(&GameConfig::default())
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            scene: Scene::new(),
            transforms: TransformGraph::new(),
            tweens: TweenState::new(),
            animator: Animator::default(),
            camera: Camera3D::new(config.camera.clone(), config.aspect()),
            lights: LightState::new(),
            materials: MaterialTable::new(config.max_materials),
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawn an entity with an identity transform.
    pub fn spawn(&mut self, tag: impl Into<String>) -> EntityId {
        self.spawn_with(tag, Transform::new())
    }

    /// Spawn an entity owning `transform`.
    pub fn spawn_with(&mut self, tag: impl Into<String>, transform: Transform) -> EntityId {
        let id = self.next_id();
        let t = self.transforms.insert(transform);
        self.scene.spawn(Entity::new(id, t).with_tag(tag));
        log::debug!("spawned {:?} with transform {:?}", id, t);
        id
    }

    /// Despawn an entity along with its transform, tweens and animation
    /// tracks. Child transforms become roots.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.scene.despawn(id) else {
            return false;
        };
        self.transforms.remove(entity.transform);
        self.tweens.remove_transform(entity.transform);
        self.animator.remove_transform(entity.transform);
        true
    }

    /// Transform handle of an entity.
    pub fn transform_id(&self, id: EntityId) -> Option<TransformId> {
        self.scene.get(id).map(|e| e.transform)
    }

    pub fn transform(&self, id: EntityId) -> Option<&Transform> {
        self.transform_id(id).and_then(|t| self.transforms.get(t))
    }

    pub fn transform_mut(&mut self, id: EntityId) -> Option<&mut Transform> {
        let t = self.transform_id(id)?;
        self.transforms.get_mut(t)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.scene.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.scene.get_mut(id)
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Render context for optional custom render commands.
pub struct RenderContext<'a> {
    pub render_buffer: &'a mut RenderBuffer,
    pub camera: &'a mut CameraUniform,
    pub transforms: &'a TransformGraph,
}
