/// Shared frame-buffer layout.
/// Must stay in sync with the host renderer's `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Camera: 36 floats]  view, projection, eye position
/// [Lights: MAX_LIGHTS × 16 floats]
/// [Materials: max_materials × 8 floats]
/// [Instances: max_instances × 36 floats]
/// ```
///
/// Capacities and live counts are written into the header every frame.
/// The host reads them back to compute offsets.

use crate::api::game::GameConfig;
use crate::renderer::camera::CameraUniform;
use crate::renderer::instance::RenderInstance;
use crate::renderer::material::Material;
use crate::systems::lighting::{Light, MAX_LIGHTS};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_INSTANCES: usize = 2;
pub const HEADER_INSTANCE_COUNT: usize = 3;
pub const HEADER_TOTAL_TIME: usize = 4;
pub const HEADER_VIEWPORT_WIDTH: usize = 5;
pub const HEADER_VIEWPORT_HEIGHT: usize = 6;
pub const HEADER_PROTOCOL_VERSION: usize = 7;
pub const HEADER_CAMERA_X: usize = 8;
pub const HEADER_CAMERA_Y: usize = 9;
pub const HEADER_CAMERA_Z: usize = 10;
pub const HEADER_LIGHT_COUNT: usize = 11;
pub const HEADER_MATERIAL_COUNT: usize = 12;
pub const HEADER_AMBIENT_R: usize = 13;
pub const HEADER_AMBIENT_G: usize = 14;
pub const HEADER_AMBIENT_B: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 2.0;

/// Floats per render instance (wire format, never changes).
pub const INSTANCE_FLOATS: usize = RenderInstance::FLOATS;

/// Floats in the camera section (wire format, never changes).
pub const CAMERA_FLOATS: usize = CameraUniform::FLOATS;

/// Floats per light.
pub const LIGHT_FLOATS: usize = Light::FLOATS;

/// Floats per material.
pub const MATERIAL_FLOATS: usize = Material::FLOATS;

/// Buffer layout computed from the configured capacities.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_instances: usize,
    pub max_materials: usize,

    /// Size of instance data section in floats.
    pub instance_data_floats: usize,

    /// Offset (in floats) where camera data begins.
    pub camera_data_offset: usize,
    pub light_data_offset: usize,
    pub material_data_offset: usize,
    /// Offset (in floats) where instance data begins.
    pub instance_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(max_instances: usize, max_materials: usize) -> Self {
        let instance_data_floats = max_instances * INSTANCE_FLOATS;

        let camera_data_offset = HEADER_FLOATS;
        let light_data_offset = camera_data_offset + CAMERA_FLOATS;
        let material_data_offset = light_data_offset + MAX_LIGHTS * LIGHT_FLOATS;
        let instance_data_offset = material_data_offset + max_materials * MATERIAL_FLOATS;

        let buffer_total_floats = instance_data_offset + instance_data_floats;
        let buffer_total_bytes = buffer_total_floats * 4;

        Self {
            max_instances,
            max_materials,
            instance_data_floats,
            camera_data_offset,
            light_data_offset,
            material_data_offset,
            instance_data_offset,
            buffer_total_floats,
            buffer_total_bytes,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.max_instances, config.max_materials)
    }

    pub fn max_lights(&self) -> usize {
        MAX_LIGHTS
    }

    /// Range of the camera section inside the buffer.
    pub fn camera_range(&self) -> std::ops::Range<usize> {
        self.camera_data_offset..self.camera_data_offset + CAMERA_FLOATS
    }

    /// Range covering the whole light section.
    pub fn light_range(&self) -> std::ops::Range<usize> {
        self.light_data_offset..self.material_data_offset
    }

    /// Range covering the whole material section.
    pub fn material_range(&self) -> std::ops::Range<usize> {
        self.material_data_offset..self.instance_data_offset
    }

    /// Range covering `count` instances, clamped to capacity.
    pub fn instance_range(&self, count: usize) -> std::ops::Range<usize> {
        let count = count.min(self.max_instances);
        self.instance_data_offset..self.instance_data_offset + count * INSTANCE_FLOATS
    }
}
