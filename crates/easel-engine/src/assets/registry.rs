use std::collections::HashMap;
use crate::api::types::EntityId;

/// Tag → entity lookup, built while instantiating a `SceneManifest`.
/// Lets game code find manifest entities by the names it wrote in JSON.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: HashMap<String, EntityId>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tag. Returns the previous entity if the tag was taken.
    pub fn insert(&mut self, tag: impl Into<String>, id: EntityId) -> Option<EntityId> {
        self.entities.insert(tag.into(), id)
    }

    /// Look up an entity by tag. Returns None if not found.
    pub fn get(&self, tag: &str) -> Option<EntityId> {
        self.entities.get(tag).copied()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entities.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, EntityId)> {
        self.entities.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
