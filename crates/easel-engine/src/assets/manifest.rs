use std::collections::{HashMap, HashSet};
use std::fmt;
use serde::{Deserialize, Serialize};

use crate::api::game::EngineContext;
use crate::api::types::{MaterialId, MeshId, TransformId};
use crate::assets::registry::EntityRegistry;
use crate::extensions::hierarchy::TransformError;
use crate::extensions::transform::Transform;
use crate::renderer::camera::CameraConfig;
use crate::systems::animation::{AnimationTrack, EasedChannel, TimeSource};

/// Scene description: entities, camera overrides and the animation script.
/// Loaded from a JSON file at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneManifest {
    #[serde(default)]
    pub entities: Vec<EntityDescriptor>,
    /// Replaces the game's camera tuning when present.
    #[serde(default)]
    pub camera: Option<CameraConfig>,
    #[serde(default)]
    pub animation: Option<AnimationDescriptor>,
}

/// One entity and its starting transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Unique name, used by `parent` and by animation tracks.
    pub tag: String,
    #[serde(default)]
    pub position: [f32; 3],
    /// Pitch, yaw, roll in radians.
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    /// Tag of the parent entity.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub mesh: Option<u32>,
    #[serde(default)]
    pub material: Option<u32>,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Time source plus the tracks it drives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimationDescriptor {
    #[serde(default)]
    pub source: TimeSource,
    #[serde(default)]
    pub tracks: Vec<TrackDescriptor>,
}

/// Eased channels for the entity named by `entity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackDescriptor {
    pub entity: String,
    pub channels: Vec<EasedChannel>,
}

fn unit_scale() -> [f32; 3] {
    [1.0; 3]
}

fn default_active() -> bool {
    true
}

/// Failure to parse or instantiate a `SceneManifest`.
#[derive(Debug)]
pub enum ManifestError {
    Json(serde_json::Error),
    /// A parent or track names a tag no entity has.
    UnknownEntity(String),
    /// Tag repeated in the manifest or already present in the scene.
    DuplicateTag(String),
    /// The parent chain starting at this tag loops back on itself.
    ParentCycle(String),
    Hierarchy(TransformError),
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::Json(e) => write!(f, "invalid scene manifest: {}", e),
            ManifestError::UnknownEntity(tag) => write!(f, "unknown entity tag '{}'", tag),
            ManifestError::DuplicateTag(tag) => write!(f, "entity tag '{}' used more than once", tag),
            ManifestError::ParentCycle(tag) => write!(f, "parent chain of '{}' forms a cycle", tag),
            ManifestError::Hierarchy(e) => write!(f, "scene hierarchy: {}", e),
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ManifestError::Json(e) => Some(e),
            ManifestError::Hierarchy(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ManifestError {
    fn from(e: serde_json::Error) -> Self {
        ManifestError::Json(e)
    }
}

impl From<TransformError> for ManifestError {
    fn from(e: TransformError) -> Self {
        ManifestError::Hierarchy(e)
    }
}

impl SceneManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check tags, references and parent chains without touching any engine state.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut tags = HashSet::with_capacity(self.entities.len());
        for desc in &self.entities {
            if !tags.insert(desc.tag.as_str()) {
                return Err(ManifestError::DuplicateTag(desc.tag.clone()));
            }
        }

        let parents = self.entities.iter().filter_map(|d| d.parent.as_deref());
        let tracked = self
            .animation
            .iter()
            .flat_map(|a| a.tracks.iter().map(|t| t.entity.as_str()));
        for tag in parents.chain(tracked) {
            if !tags.contains(tag) {
                return Err(ManifestError::UnknownEntity(tag.to_string()));
            }
        }

        self.check_parent_chains()
    }

    /// Walk each entity's parent chain; a chain longer than the entity
    /// count must revisit a tag.
    fn check_parent_chains(&self) -> Result<(), ManifestError> {
        let parent_of: HashMap<&str, &str> = self
            .entities
            .iter()
            .filter_map(|d| d.parent.as_deref().map(|p| (d.tag.as_str(), p)))
            .collect();

        for desc in &self.entities {
            let mut current = desc.tag.as_str();
            let mut steps = 0;
            while let Some(&parent) = parent_of.get(current) {
                steps += 1;
                if parent == desc.tag || steps > parent_of.len() {
                    return Err(ManifestError::ParentCycle(desc.tag.clone()));
                }
                current = parent;
            }
        }
        Ok(())
    }

    /// Spawn every entity into `ctx`, link parents, apply the camera
    /// override and append the animation tracks to `ctx.animator`.
    ///
    /// All checks run before anything is spawned, so a rejected manifest
    /// leaves `ctx` untouched. Tags already used by entities in the scene
    /// are rejected. The manifest's time source is only adopted when the
    /// animator has no tracks yet.
    pub fn instantiate(&self, ctx: &mut EngineContext) -> Result<EntityRegistry, ManifestError> {
        self.validate()?;
        if let Some(taken) = self.entities.iter().find(|d| ctx.scene.find_by_tag(&d.tag).is_some()) {
            return Err(ManifestError::DuplicateTag(taken.tag.clone()));
        }

        let mut registry = EntityRegistry::new();
        for desc in &self.entities {
            let transform = Transform::new()
                .with_position(desc.position)
                .with_euler_rotation(desc.rotation)
                .with_scale(desc.scale);
            let id = ctx.spawn_with(desc.tag.clone(), transform);
            if let Some(entity) = ctx.entity_mut(id) {
                entity.mesh = desc.mesh.map(MeshId);
                entity.material = desc.material.map(MaterialId);
                entity.active = desc.active;
            }
            registry.insert(desc.tag.clone(), id);
        }

        for desc in &self.entities {
            let Some(parent_tag) = desc.parent.as_deref() else { continue };
            let child = transform_of(ctx, &registry, &desc.tag)?;
            let parent = transform_of(ctx, &registry, parent_tag)?;
            ctx.transforms.set_parent(child, Some(parent))?;
        }

        if let Some(camera) = &self.camera {
            ctx.camera.configure(camera.clone());
        }

        if let Some(anim) = &self.animation {
            if ctx.animator.track_count() == 0 {
                ctx.animator.source = anim.source;
            } else if ctx.animator.source != anim.source {
                log::warn!(
                    "scene manifest: keeping animator time source {:?}, ignoring {:?}",
                    ctx.animator.source,
                    anim.source
                );
            }
            for track in &anim.tracks {
                let transform = transform_of(ctx, &registry, &track.entity)?;
                ctx.animator.add_track(AnimationTrack {
                    transform,
                    channels: track.channels.clone(),
                });
            }
        }

        log::info!(
            "scene manifest: {} entities, {} animation tracks",
            registry.len(),
            ctx.animator.track_count()
        );
        Ok(registry)
    }
}

fn transform_of(ctx: &EngineContext, registry: &EntityRegistry, tag: &str) -> Result<TransformId, ManifestError> {
    registry
        .get(tag)
        .and_then(|id| ctx.transform_id(id))
        .ok_or_else(|| ManifestError::UnknownEntity(tag.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::FrameTime;
    use crate::extensions::easing::EasingCurve;
    use crate::systems::animation::Channel;
    use glam::Vec3;

    const BOUNCE_SCENE: &str = r#"{
        "entities": [
            { "tag": "centre", "mesh": 0, "material": 0 },
            { "tag": "right", "position": [5, 0, 0], "mesh": 0, "material": 1 },
            { "tag": "left", "position": [-5, 0, 0], "mesh": 0, "material": 2 },
            { "tag": "ground", "position": [0, -3, 0], "scale": [1000, 1, 1000], "mesh": 1 },
            { "tag": "marker", "position": [0, 2, 0], "parent": "centre" }
        ],
        "camera": { "home": [0, 0, -10], "sprint_speed": 10 },
        "animation": {
            "source": { "kind": "oscillate", "frequency": 1.0 },
            "tracks": [
                { "entity": "centre", "channels": [
                    { "channel": "position_y", "curve": "ease_in_bounce", "gain": 2, "bias": -1 }
                ]},
                { "entity": "right", "channels": [
                    { "channel": "scale_y", "curve": "ease_in_out_cubic", "phase": 0.5 }
                ]}
            ]
        }
    }"#;

    #[test]
    fn parse_and_instantiate() {
        let manifest = SceneManifest::from_json(BOUNCE_SCENE).unwrap();
        let mut ctx = EngineContext::new();
        let registry = manifest.instantiate(&mut ctx).unwrap();

        assert_eq!(registry.len(), 5);
        assert_eq!(ctx.scene.len(), 5);
        assert_eq!(ctx.animator.track_count(), 2);
        assert_eq!(ctx.camera.config.sprint_speed, 10.0);
        // Unset camera fields keep their defaults.
        assert_eq!(ctx.camera.config.move_speed, 1.0);

        let ground = registry.get("ground").unwrap();
        assert_eq!(ctx.transform(ground).unwrap().scale(), Vec3::new(1000.0, 1.0, 1000.0));
        assert!(ctx.entity(registry.get("marker").unwrap()).unwrap().mesh.is_none());
    }

    #[test]
    fn parent_links_compose() {
        let manifest = SceneManifest::from_json(BOUNCE_SCENE).unwrap();
        let mut ctx = EngineContext::new();
        let registry = manifest.instantiate(&mut ctx).unwrap();

        let centre = ctx.transform_id(registry.get("centre").unwrap()).unwrap();
        let marker = ctx.transform_id(registry.get("marker").unwrap()).unwrap();
        assert_eq!(ctx.transforms.parent(marker), Some(centre));

        let frame = FrameTime { dt: 0.0, total: std::f32::consts::FRAC_PI_2, frame_index: 0 };
        ctx.animator.update(&frame, &mut ctx.transforms);
        // Centre rises to y = 1, the marker rides 2 above it.
        let world = ctx.transforms.composed_world_matrix(marker).unwrap();
        assert!((world.w_axis.y - 3.0).abs() < 1e-3);
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let manifest = SceneManifest::from_json(r#"{ "entities": [ { "tag": "a" } ] }"#).unwrap();
        let desc = &manifest.entities[0];
        assert_eq!(desc.scale, [1.0; 3]);
        assert!(desc.active);
        assert!(manifest.camera.is_none());
    }

    #[test]
    fn duplicate_tag_rejected_before_spawn() {
        let json = r#"{ "entities": [ { "tag": "a" }, { "tag": "a" } ] }"#;
        let manifest = SceneManifest::from_json(json).unwrap();
        let mut ctx = EngineContext::new();
        assert!(matches!(manifest.instantiate(&mut ctx), Err(ManifestError::DuplicateTag(t)) if t == "a"));
        assert!(ctx.scene.is_empty());
    }

    #[test]
    fn unknown_parent_rejected() {
        let json = r#"{ "entities": [ { "tag": "a", "parent": "ghost" } ] }"#;
        let manifest = SceneManifest::from_json(json).unwrap();
        assert!(matches!(manifest.validate(), Err(ManifestError::UnknownEntity(t)) if t == "ghost"));
    }

    #[test]
    fn unknown_track_entity_rejected() {
        let json = r#"{ "animation": { "tracks": [ { "entity": "ghost", "channels": [] } ] } }"#;
        let manifest = SceneManifest::from_json(json).unwrap();
        assert!(matches!(manifest.validate(), Err(ManifestError::UnknownEntity(_))));
    }

    #[test]
    fn parent_cycle_rejected_before_spawn() {
        let json = r#"{ "entities": [
            { "tag": "a", "parent": "b" },
            { "tag": "b", "parent": "a" }
        ] }"#;
        let manifest = SceneManifest::from_json(json).unwrap();
        assert!(matches!(manifest.validate(), Err(ManifestError::ParentCycle(_))));

        let mut ctx = EngineContext::new();
        ctx.spawn("existing");
        assert!(manifest.instantiate(&mut ctx).is_err());
        assert_eq!(ctx.scene.len(), 1);
        assert_eq!(ctx.transforms.len(), 1);
    }

    #[test]
    fn self_parent_and_long_cycles_rejected() {
        let own = r#"{ "entities": [ { "tag": "a", "parent": "a" } ] }"#;
        let manifest = SceneManifest::from_json(own).unwrap();
        assert!(matches!(manifest.validate(), Err(ManifestError::ParentCycle(t)) if t == "a"));

        // The loop sits above a valid leaf.
        let ring = r#"{ "entities": [
            { "tag": "leaf", "parent": "a" },
            { "tag": "a", "parent": "b" },
            { "tag": "b", "parent": "c" },
            { "tag": "c", "parent": "a" }
        ] }"#;
        let manifest = SceneManifest::from_json(ring).unwrap();
        assert!(matches!(manifest.validate(), Err(ManifestError::ParentCycle(_))));

        let chain = r#"{ "entities": [
            { "tag": "a", "parent": "b" },
            { "tag": "b", "parent": "c" },
            { "tag": "c" }
        ] }"#;
        assert!(SceneManifest::from_json(chain).unwrap().validate().is_ok());
    }

    #[test]
    fn tags_already_in_scene_rejected() {
        let mut ctx = EngineContext::new();
        ctx.spawn("ground");
        let json = r#"{ "entities": [ { "tag": "pole" }, { "tag": "ground" } ] }"#;
        let manifest = SceneManifest::from_json(json).unwrap();
        assert!(matches!(manifest.instantiate(&mut ctx), Err(ManifestError::DuplicateTag(t)) if t == "ground"));
        assert_eq!(ctx.scene.len(), 1);

        // Loading the same manifest twice fails the second time.
        let once = SceneManifest::from_json(r#"{ "entities": [ { "tag": "pole" } ] }"#).unwrap();
        assert!(once.instantiate(&mut ctx).is_ok());
        assert!(matches!(once.instantiate(&mut ctx), Err(ManifestError::DuplicateTag(_))));
        assert_eq!(ctx.scene.len(), 2);
    }

    #[test]
    fn manifest_tracks_join_existing_animator() {
        let mut ctx = EngineContext::new();
        let game_block = ctx.spawn("block");
        let block_t = ctx.transform_id(game_block).unwrap();
        ctx.animator.source = TimeSource::Loop { period: 2.0 };
        ctx.animator.add_track(
            AnimationTrack::new(block_t).with_channel(EasedChannel::new(Channel::PositionY, EasingCurve::EaseOutQuad)),
        );

        let manifest = SceneManifest::from_json(BOUNCE_SCENE).unwrap();
        manifest.instantiate(&mut ctx).unwrap();

        assert_eq!(ctx.animator.track_count(), 3);
        assert_eq!(ctx.animator.source, TimeSource::Loop { period: 2.0 });

        let frame = FrameTime { dt: 0.0, total: 1.0, frame_index: 0 };
        ctx.animator.update(&frame, &mut ctx.transforms);
        let expected = EasingCurve::EaseOutQuad.evaluate(0.5);
        assert!((ctx.transform(game_block).unwrap().position().y - expected).abs() < 1e-5);
    }

    #[test]
    fn manifest_source_used_by_empty_animator() {
        let mut ctx = EngineContext::new();
        let json = r#"{ "entities": [ { "tag": "a" } ],
            "animation": { "source": { "kind": "loop", "period": 4.0 }, "tracks": [] } }"#;
        SceneManifest::from_json(json).unwrap().instantiate(&mut ctx).unwrap();
        assert_eq!(ctx.animator.source, TimeSource::Loop { period: 4.0 });
    }

    #[test]
    fn bad_json_is_json_error() {
        let err = SceneManifest::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ManifestError::Json(_)));
        assert!(err.to_string().starts_with("invalid scene manifest"));
    }

    #[test]
    fn unknown_curve_name_fails_to_parse() {
        let json = r#"{ "animation": { "tracks": [ { "entity": "a", "channels": [
            { "channel": "yaw", "curve": "ease_sideways" } ] } ] } }"#;
        assert!(SceneManifest::from_json(json).is_err());
    }
}
