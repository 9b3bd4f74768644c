// extensions/transform.rs
//
// Position / euler rotation / scale with lazily derived world matrices
// and orientation basis.
//
// Every mutation only flips a dirty flag. The first getter call after a
// mutation recomputes the cache; later calls return the cached value.
// Caches sit in `Cell`s so a renderer holding `&Transform` can still read
// fresh matrices. That makes `Transform` `!Sync`: one owner at a time.

use std::cell::Cell;
use glam::{EulerRot, Mat4, Quat, Vec3};

/// World matrix and its inverse-transpose, always recomputed together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldMatrices {
    /// Object space → world space (scale, then rotation, then translation).
    pub world: Mat4,
    /// `transpose(inverse(world))`, for transforming normals.
    pub world_inverse_transpose: Mat4,
}

impl WorldMatrices {
    const IDENTITY: Self = Self {
        world: Mat4::IDENTITY,
        world_inverse_transpose: Mat4::IDENTITY,
    };
}

/// Orientation basis: the canonical axes rotated by the current rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

impl Basis {
    const CANONICAL: Self = Self {
        right: Vec3::X,
        up: Vec3::Y,
        forward: Vec3::Z,
    };
}

/// Spatial state of one scene object.
#[derive(Debug, Clone)]
pub struct Transform {
    position: Vec3,
    /// (pitch, yaw, roll) in radians.
    euler: Vec3,
    scale: Vec3,

    matrices: Cell<WorldMatrices>,
    basis: Cell<Basis>,
    matrix_dirty: Cell<bool>,
    direction_dirty: Cell<bool>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            euler: Vec3::ZERO,
            scale: Vec3::ONE,
            matrices: Cell::new(WorldMatrices::IDENTITY),
            basis: Cell::new(Basis::CANONICAL),
            matrix_dirty: Cell::new(false),
            direction_dirty: Cell::new(false),
        }
    }
}

impl Transform {
    /// Identity transform: origin, no rotation, unit scale.
    pub fn new() -> Self {
        Self::default()
    }

    // -- Builder pattern --

    pub fn with_position(mut self, position: impl Into<Vec3>) -> Self {
        self.set_position(position);
        self
    }

    pub fn with_euler_rotation(mut self, euler: impl Into<Vec3>) -> Self {
        self.set_euler_rotation(euler);
        self
    }

    pub fn with_scale(mut self, scale: impl Into<Vec3>) -> Self {
        self.set_scale(scale);
        self
    }

    // -- Setters --

    pub fn set_position(&mut self, position: impl Into<Vec3>) {
        self.position = position.into();
        self.matrix_dirty.set(true);
    }

    /// Overwrite the rotation with (pitch, yaw, roll) in radians.
    pub fn set_euler_rotation(&mut self, euler: impl Into<Vec3>) {
        self.euler = euler.into();
        self.mark_rotation_dirty();
    }

    pub fn set_scale(&mut self, scale: impl Into<Vec3>) {
        self.scale = scale.into();
        self.matrix_dirty.set(true);
    }

    pub fn set_uniform_scale(&mut self, s: f32) {
        self.set_scale(Vec3::splat(s));
    }

    // -- Mutators --

    /// Shift along world axes, ignoring the current rotation.
    pub fn move_abs(&mut self, offset: impl Into<Vec3>) {
        self.position += offset.into();
        self.matrix_dirty.set(true);
    }

    /// Shift along the transform's own axes: the offset is rotated into
    /// world space by the current orientation first.
    pub fn move_relative(&mut self, offset: impl Into<Vec3>) {
        self.position += self.rotation() * offset.into();
        self.matrix_dirty.set(true);
    }

    /// Add (pitch, yaw, roll) to the current angles.
    pub fn rotate_euler(&mut self, delta: impl Into<Vec3>) {
        self.euler += delta.into();
        self.mark_rotation_dirty();
    }

    /// Add to each scale component. See `set_scale` to overwrite.
    pub fn scale_by(&mut self, delta: impl Into<Vec3>) {
        self.scale += delta.into();
        self.matrix_dirty.set(true);
    }

    /// Add `s` to all three scale components.
    pub fn scale_uniform_by(&mut self, s: f32) {
        self.scale_by(Vec3::splat(s));
    }

    // -- Getters --

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// (pitch, yaw, roll) in radians.
    pub fn euler_rotation(&self) -> Vec3 {
        self.euler
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Orientation quaternion. Roll is applied first, then pitch, then yaw.
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.euler.y, self.euler.x, self.euler.z)
    }

    pub fn world_matrix(&self) -> Mat4 {
        self.clean_matrices().world
    }

    pub fn world_inverse_transpose_matrix(&self) -> Mat4 {
        self.clean_matrices().world_inverse_transpose
    }

    /// Both world matrices from a single recompute.
    pub fn world_matrices(&self) -> WorldMatrices {
        self.clean_matrices()
    }

    pub fn right(&self) -> Vec3 {
        self.clean_basis().right
    }

    pub fn up(&self) -> Vec3 {
        self.clean_basis().up
    }

    pub fn forward(&self) -> Vec3 {
        self.clean_basis().forward
    }

    /// Whether the next matrix read will recompute.
    pub fn is_matrix_dirty(&self) -> bool {
        self.matrix_dirty.get()
    }

    /// Whether the next right/up/forward read will recompute.
    pub fn is_direction_dirty(&self) -> bool {
        self.direction_dirty.get()
    }

    // -- Cache maintenance --

    fn mark_rotation_dirty(&mut self) {
        self.matrix_dirty.set(true);
        self.direction_dirty.set(true);
    }

    fn clean_matrices(&self) -> WorldMatrices {
        if self.matrix_dirty.get() {
            let world = Mat4::from_scale_rotation_translation(
                self.scale,
                self.rotation(),
                self.position,
            );
            // A zero scale component makes `world` singular; the
            // inverse-transpose then holds non-finite values.
            self.matrices.set(WorldMatrices {
                world,
                world_inverse_transpose: world.inverse().transpose(),
            });
            self.matrix_dirty.set(false);
        }
        self.matrices.get()
    }

    fn clean_basis(&self) -> Basis {
        if self.direction_dirty.get() {
            let q = self.rotation();
            self.basis.set(Basis {
                right: q * Vec3::X,
                up: q * Vec3::Y,
                forward: q * Vec3::Z,
            });
            self.direction_dirty.set(false);
        }
        self.basis.get()
    }
}
