use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Per-instance render data written to the frame buffer for the external renderer.
/// Must match the host protocol: 36 floats = 144 bytes stride.
///
/// Matrices are column-major, as glam stores them.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RenderInstance {
    /// Composed world matrix (parents applied).
    pub world: Mat4,
    /// Inverse-transpose of `world`, for normals.
    pub world_inverse_transpose: Mat4,
    /// Mesh handle as a float.
    pub mesh: f32,
    /// Material handle as a float, or -1.0 for none.
    pub material: f32,
    pub _pad: [f32; 2],
}

impl RenderInstance {
    pub const FLOATS: usize = 36;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn new(world: Mat4, world_inverse_transpose: Mat4, mesh: u32, material: Option<u32>) -> Self {
        Self {
            world,
            world_inverse_transpose,
            mesh: mesh as f32,
            material: material.map_or(-1.0, |m| m as f32),
            _pad: [0.0; 2],
        }
    }
}

impl Default for RenderInstance {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY, 0, None)
    }
}

/// Instances for one frame, bounded by the protocol's `max_instances`.
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
    capacity: usize,
    /// Instances that did not fit this frame.
    dropped: usize,
}

impl RenderBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.dropped = 0;
    }

    /// Append an instance. Returns false (and counts a drop) when full.
    pub fn push(&mut self, instance: RenderInstance) -> bool {
        if self.instances.len() >= self.capacity {
            self.dropped += 1;
            return false;
        }
        self.instances.push(instance);
        true
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn is_full(&self) -> bool {
        self.instances.len() >= self.capacity
    }

    /// Instance data as flat floats, ready to copy into the frame buffer.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new(512)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn render_instance_is_36_floats() {
        assert_eq!(std::mem::size_of::<RenderInstance>(), 144);
        assert_eq!(RenderInstance::STRIDE_BYTES, 144);
    }

    #[test]
    fn missing_material_is_negative() {
        let inst = RenderInstance::new(Mat4::IDENTITY, Mat4::IDENTITY, 3, None);
        assert_eq!(inst.mesh, 3.0);
        assert_eq!(inst.material, -1.0);
    }

    #[test]
    fn push_stops_at_capacity() {
        let mut buf = RenderBuffer::new(2);
        assert!(buf.push(RenderInstance::default()));
        assert!(buf.push(RenderInstance::default()));
        assert!(!buf.push(RenderInstance::default()));
        assert_eq!(buf.instance_count(), 2);
        assert_eq!(buf.dropped(), 1);

        buf.clear();
        assert_eq!(buf.dropped(), 0);
        assert!(!buf.is_full());
    }

    #[test]
    fn floats_are_column_major() {
        let world = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let mut buf = RenderBuffer::new(1);
        buf.push(RenderInstance::new(world, Mat4::IDENTITY, 0, Some(1)));

        let floats = buf.as_floats();
        assert_eq!(floats.len(), RenderInstance::FLOATS);
        assert_eq!(&floats[12..15], &[1.0, 2.0, 3.0]);
        assert_eq!(floats[33], 1.0);
    }
}
