use crate::core::scene::Scene;
use crate::extensions::hierarchy::TransformGraph;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Build the render buffer from the scene.
/// Visits entities in spawn order; skips inactive ones and ones without a
/// mesh. Reading the matrices triggers any pending lazy recompute.
/// Returns the number of instances written.
pub fn build_render_buffer(scene: &Scene, graph: &TransformGraph, buffer: &mut RenderBuffer) -> usize {
    buffer.clear();

    for entity in scene.iter() {
        if !entity.active {
            continue;
        }
        let Some(mesh) = entity.mesh else { continue };

        let (Some(world), Some(world_it)) = (
            graph.composed_world_matrix(entity.transform),
            graph.composed_world_inverse_transpose(entity.transform),
        ) else {
            log::warn!("entity {:?} points at missing transform {:?}", entity.id, entity.transform);
            continue;
        };

        let instance = RenderInstance::new(world, world_it, mesh.0, entity.material.map(|m| m.0));
        buffer.push(instance);
    }

    if buffer.dropped() > 0 {
        log::warn!(
            "render buffer full: dropped {} of {} instances",
            buffer.dropped(),
            buffer.dropped() + buffer.instances.len()
        );
    }

    buffer.instances.len()
}
