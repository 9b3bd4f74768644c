/// Scene lights for the renderer's shading pass.
///
/// Lights are persistent: they stay until explicitly removed. Each frame the
/// runner copies the active lights into the frame buffer's light section.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Most lights the shading pass reads per frame.
pub const MAX_LIGHTS: usize = 5;

/// `Light::kind` values.
pub const LIGHT_POINT: f32 = 0.0;
pub const LIGHT_DIRECTIONAL: f32 = 1.0;

/// A point or directional light.
///
/// Wire format (16 floats / 64 bytes):
/// `[kind, dir.xyz, range, pos.xyz, intensity, color.rgb, spot_falloff, pad.xyz]`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Light {
    pub kind: f32,
    pub direction: [f32; 3],
    /// Falloff distance for point lights, unused by directional ones.
    pub range: f32,
    pub position: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    pub spot_falloff: f32,
    pub _pad: [f32; 3],
}

impl Light {
    pub const FLOATS: usize = 16;

    /// Light radiating from `position` out to `range` world units.
    pub fn point(position: impl Into<Vec3>, color: [f32; 3], intensity: f32, range: f32) -> Self {
        Self {
            kind: LIGHT_POINT,
            position: position.into().to_array(),
            color,
            intensity,
            range,
            ..Self::zeroed()
        }
    }

    /// Light travelling along `direction`. The direction is normalized; a zero
    /// vector points straight down.
    pub fn directional(direction: impl Into<Vec3>, color: [f32; 3], intensity: f32) -> Self {
        let dir = direction.into().try_normalize().unwrap_or(Vec3::NEG_Y);
        Self {
            kind: LIGHT_DIRECTIONAL,
            direction: dir.to_array(),
            color,
            intensity,
            ..Self::zeroed()
        }
    }

    pub fn with_spot_falloff(mut self, falloff: f32) -> Self {
        self.spot_falloff = falloff;
        self
    }

    pub fn is_directional(&self) -> bool {
        self.kind == LIGHT_DIRECTIONAL
    }
}

/// Active lights plus the ambient term.
///
/// The ambient color defaults to white, which leaves meshes unlit when no
/// lights are present. Scenes with lights usually dim it.
pub struct LightState {
    lights: Vec<Light>,
    ambient: [f32; 3],
}

impl LightState {
    pub fn new() -> Self {
        Self {
            lights: Vec::with_capacity(MAX_LIGHTS),
            ambient: [1.0, 1.0, 1.0],
        }
    }

    /// Add a light. Returns false when `MAX_LIGHTS` are already active.
    pub fn add(&mut self, light: Light) -> bool {
        if self.lights.len() >= MAX_LIGHTS {
            log::warn!("light ignored: {} lights already active", MAX_LIGHTS);
            return false;
        }
        self.lights.push(light);
        true
    }

    pub fn clear(&mut self) {
        self.lights.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Light> {
        self.lights.iter_mut()
    }

    /// Remove lights that don't match a predicate.
    pub fn retain<F: FnMut(&Light) -> bool>(&mut self, f: F) {
        self.lights.retain(f);
    }

    pub fn count(&self) -> usize {
        self.lights.len()
    }

    pub fn set_ambient(&mut self, r: f32, g: f32, b: f32) {
        self.ambient = [r, g, b];
    }

    pub fn ambient(&self) -> [f32; 3] {
        self.ambient
    }

    /// Light data as flat floats for the frame buffer.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.lights)
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_is_16_floats() {
        assert_eq!(std::mem::size_of::<Light>(), Light::FLOATS * 4);
    }

    #[test]
    fn point_light_fields() {
        let light = Light::point((5.0, 0.0, 0.0), [1.0, 0.5, 0.0], 5.0, 20.0).with_spot_falloff(0.3);
        assert_eq!(light.kind, LIGHT_POINT);
        assert_eq!(light.position, [5.0, 0.0, 0.0]);
        assert_eq!(light.range, 20.0);
        assert_eq!(light.spot_falloff, 0.3);
        assert!(!light.is_directional());
    }

    #[test]
    fn directional_light_is_normalized() {
        let light = Light::directional((0.0, -2.0, 0.0), [1.0; 3], 10.0);
        assert!(light.is_directional());
        assert_eq!(light.direction, [0.0, -1.0, 0.0]);

        let degenerate = Light::directional(Vec3::ZERO, [1.0; 3], 1.0);
        assert_eq!(degenerate.direction, [0.0, -1.0, 0.0]);
    }

    #[test]
    fn add_stops_at_max_lights() {
        let mut state = LightState::new();
        for i in 0..MAX_LIGHTS {
            assert!(state.add(Light::point((i as f32, 0.0, 0.0), [1.0; 3], 1.0, 10.0)));
        }
        assert!(!state.add(Light::point(Vec3::ZERO, [1.0; 3], 1.0, 10.0)));
        assert_eq!(state.count(), MAX_LIGHTS);
        assert_eq!(state.as_floats().len(), MAX_LIGHTS * Light::FLOATS);
    }

    #[test]
    fn as_floats_follows_wire_order() {
        let mut state = LightState::new();
        state.add(Light::point((1.0, 2.0, 3.0), [0.1, 0.2, 0.3], 4.0, 9.0));
        let f = state.as_floats();
        assert_eq!(f[0], LIGHT_POINT);
        assert_eq!(f[4], 9.0);
        assert_eq!(&f[5..8], &[1.0, 2.0, 3.0]);
        assert_eq!(f[8], 4.0);
        assert_eq!(&f[9..12], &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn retain_and_ambient() {
        let mut state = LightState::new();
        assert_eq!(state.ambient(), [1.0, 1.0, 1.0]);
        state.set_ambient(0.1, 0.1, 0.15);
        assert_eq!(state.ambient(), [0.1, 0.1, 0.15]);

        state.add(Light::point(Vec3::ZERO, [1.0; 3], 0.5, 10.0));
        state.add(Light::directional(Vec3::NEG_Y, [1.0; 3], 2.0));
        state.retain(|l| l.is_directional());
        assert_eq!(state.count(), 1);
        state.clear();
        assert_eq!(state.count(), 0);
    }
}
