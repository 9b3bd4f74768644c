use crate::api::types::{EntityId, MaterialId, MeshId, TransformId};

/// Fat Entity — a named object pointing at exactly one transform, plus
/// opaque appearance handles the renderer resolves.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Whether this entity is active (inactive entities are not drawn).
    pub active: bool,
    /// Spatial state, stored in the context's `TransformGraph`.
    pub transform: TransformId,
    /// Geometry handle (entities without a mesh are invisible).
    pub mesh: Option<MeshId>,
    pub material: Option<MaterialId>,
}

impl Entity {
    pub fn new(id: EntityId, transform: TransformId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            transform,
            mesh: None,
            material: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_mesh(mut self, mesh: MeshId) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}
