pub mod instance;
pub mod camera;
pub mod material;

pub use instance::{RenderInstance, RenderBuffer};
pub use camera::{Camera3D, CameraConfig, CameraUniform};
pub use material::{Material, MaterialTable};
