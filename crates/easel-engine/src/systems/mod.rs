pub mod render;
pub mod animation;
pub mod lighting;
