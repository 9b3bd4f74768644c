use bytemuck::{Pod, Zeroable};

use crate::api::types::MaterialId;

/// Surface parameters the host shader reads per material.
///
/// Wire format (8 floats / 32 bytes): `[tint.rgba, uv_scale.xy, uv_offset.xy]`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Material {
    pub color_tint: [f32; 4],
    pub uv_scale: [f32; 2],
    pub uv_offset: [f32; 2],
}

impl Material {
    pub const FLOATS: usize = 8;

    pub fn new(color_tint: [f32; 4]) -> Self {
        Self {
            color_tint,
            ..Self::default()
        }
    }

    pub fn with_uv_scale(mut self, u: f32, v: f32) -> Self {
        self.uv_scale = [u, v];
        self
    }

    pub fn with_uv_offset(mut self, u: f32, v: f32) -> Self {
        self.uv_offset = [u, v];
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color_tint: [1.0; 4],
            uv_scale: [1.0, 1.0],
            uv_offset: [0.0, 0.0],
        }
    }
}

/// Materials addressed by `MaterialId`, in insertion order.
/// Bounded by the protocol's material capacity.
pub struct MaterialTable {
    materials: Vec<Material>,
    capacity: usize,
}

impl MaterialTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            materials: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Register a material. Returns None when the table is full.
    pub fn add(&mut self, material: Material) -> Option<MaterialId> {
        if self.materials.len() >= self.capacity {
            log::warn!("material ignored: table holds {} materials", self.capacity);
            return None;
        }
        self.materials.push(material);
        Some(MaterialId(self.materials.len() as u32 - 1))
    }

    /// Replace an existing material. Returns false for unknown ids.
    pub fn set(&mut self, id: MaterialId, material: Material) -> bool {
        match self.materials.get_mut(id.0 as usize) {
            Some(slot) => {
                *slot = material;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Material data as flat floats for the frame buffer.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.materials)
    }
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_is_8_floats() {
        assert_eq!(std::mem::size_of::<Material>(), Material::FLOATS * 4);
    }

    #[test]
    fn ids_follow_insertion_order() {
        let mut table = MaterialTable::new(4);
        assert_eq!(table.add(Material::default()), Some(MaterialId(0)));
        assert_eq!(table.add(Material::new([1.0, 0.0, 0.0, 1.0])), Some(MaterialId(1)));
        assert_eq!(table.get(MaterialId(1)).unwrap().color_tint, [1.0, 0.0, 0.0, 1.0]);
        assert!(table.get(MaterialId(2)).is_none());
    }

    #[test]
    fn add_fails_when_full() {
        let mut table = MaterialTable::new(1);
        assert!(table.add(Material::default()).is_some());
        assert!(table.add(Material::default()).is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn set_replaces_known_ids_only() {
        let mut table = MaterialTable::new(2);
        let id = table.add(Material::default()).unwrap();
        let tiled = Material::default().with_uv_scale(4.0, 4.0).with_uv_offset(0.5, 0.0);
        assert!(table.set(id, tiled));
        assert!(!table.set(MaterialId(7), tiled));
        assert_eq!(table.get(id), Some(&tiled));
    }

    #[test]
    fn as_floats_follows_wire_order() {
        let mut table = MaterialTable::new(2);
        table.add(Material::new([0.2, 0.4, 0.6, 1.0]).with_uv_scale(2.0, 3.0));
        assert_eq!(table.as_floats(), &[0.2, 0.4, 0.6, 1.0, 2.0, 3.0, 0.0, 0.0]);
    }
}
