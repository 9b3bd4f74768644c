use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use crate::extensions::transform::Transform;
use crate::input::queue::{keys, InputState};

/// Camera tuning. Deserializable so scene manifests can override it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Start position; Space snaps back here.
    pub home: [f32; 3],
    /// Units per second.
    pub move_speed: f32,
    /// Units per second while Shift is held.
    pub sprint_speed: f32,
    /// Radians per pixel of pointer motion.
    pub look_speed: f32,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            home: [0.0, 0.0, -10.0],
            move_speed: 1.0,
            sprint_speed: 20.0,
            look_speed: 0.1,
            fov: 1.0,
            near: 0.01,
            far: 1000.0,
        }
    }
}

/// GPU-side uniform data for the camera. 36 floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: Mat4,
    pub projection: Mat4,
    /// Eye position, w = 1.
    pub position: Vec4,
}

impl CameraUniform {
    pub const FLOATS: usize = 36;
}

/// Fly-through perspective camera (left-handed, +Z forward, +Y up).
pub struct Camera3D {
    pub transform: Transform,
    pub config: CameraConfig,
    aspect: f32,
    view: Mat4,
    projection: Mat4,
}

impl Camera3D {
    pub fn new(config: CameraConfig, aspect: f32) -> Self {
        let transform = Transform::new().with_position(config.home);
        let mut camera = Self {
            transform,
            config,
            aspect,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        camera.update_view_matrix();
        camera.update_projection_matrix();
        camera
    }

    /// Replace the tuning, move back to the new home and rebuild both
    /// matrices.
    pub fn configure(&mut self, config: CameraConfig) {
        self.config = config;
        self.transform.set_position(self.config.home);
        self.update_view_matrix();
        self.update_projection_matrix();
    }

    /// Apply one frame of held-key movement and pointer look, then rebuild
    /// the view matrix.
    pub fn update(&mut self, dt: f32, input: &InputState) {
        let speed = if input.key_held(keys::SHIFT) {
            self.config.sprint_speed
        } else {
            self.config.move_speed
        };
        let step = speed * dt;

        if input.key_held(keys::W) {
            self.transform.move_relative((0.0, 0.0, step));
        } else if input.key_held(keys::S) {
            self.transform.move_relative((0.0, 0.0, -step));
        }

        if input.key_held(keys::E) {
            self.transform.move_relative((0.0, step, 0.0));
        } else if input.key_held(keys::Q) {
            self.transform.move_relative((0.0, -step, 0.0));
        }

        if input.key_held(keys::A) {
            self.transform.move_relative((-step, 0.0, 0.0));
        } else if input.key_held(keys::D) {
            self.transform.move_relative((step, 0.0, 0.0));
        }

        if input.pointer_held() {
            let (dx, dy) = input.pointer_delta();
            let look = self.config.look_speed;
            self.transform.rotate_euler((dy * look, dx * look, 0.0));
        }

        if input.key_held(keys::SPACE) {
            self.transform.set_position(self.config.home);
        }

        self.update_view_matrix();
    }

    /// Rebuild the view matrix from the transform's position and forward.
    pub fn update_view_matrix(&mut self) {
        self.view = Mat4::look_to_lh(
            self.transform.position(),
            self.transform.forward(),
            Vec3::Y,
        );
    }

    /// Replace field of view and aspect ratio, then rebuild the projection.
    pub fn set_projection(&mut self, fov: f32, aspect: f32) {
        self.config.fov = fov;
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    /// Track a viewport resize. Zero-sized viewports are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            log::debug!("ignoring degenerate viewport {}x{}", width, height);
            return;
        }
        self.set_projection(self.config.fov, width / height);
    }

    fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_lh(
            self.config.fov,
            self.aspect,
            self.config.near,
            self.config.far,
        );
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view: self.view,
            projection: self.projection,
            position: self.transform.position().extend(1.0),
        }
    }
}
