pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext, RenderContext};
pub use api::types::{EntityId, TransformId, MeshId, MaterialId};
pub use components::entity::Entity;
pub use core::scene::Scene;
pub use core::time::{FrameClock, FrameTime};
pub use renderer::instance::{RenderInstance, RenderBuffer};
pub use renderer::camera::{Camera3D, CameraConfig, CameraUniform};
pub use renderer::material::{Material, MaterialTable};
pub use input::queue::{InputEvent, InputQueue, InputState};
pub use assets::manifest::{SceneManifest, ManifestError};
pub use assets::registry::EntityRegistry;
pub use bridge::protocol::ProtocolLayout;
pub use systems::animation::{Animator, AnimationTrack, Channel, EasedChannel, TimeSource};
pub use systems::lighting::{Light, LightState, MAX_LIGHTS};
pub use systems::render::build_render_buffer;

pub use extensions::{
    EasingCurve, evaluate, evaluate_index, lerp, inverse_lerp, ease, ease_vec3,
    Transform, WorldMatrices, Basis,
    TransformGraph, TransformError,
    TweenState, Tween, TweenId, TweenTarget, TweenLoop,
};
