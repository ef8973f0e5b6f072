use crate::components::mesh::{Shading, Shape};
use crate::core::scene::SceneGraph;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Build the render buffer from every visible mesh in the graph.
///
/// Instances appear in node order. Line loop vertices are appended to the
/// buffer's vertex array and referenced by offset and count. Meshes past the
/// buffer's instance capacity, and line loops past its vertex capacity, are
/// dropped with a warning, so every exported loop references written vertices.
pub fn build_render_buffer(graph: &SceneGraph, buffer: &mut RenderBuffer) {
    buffer.clear();

    for node in graph.iter() {
        if !node.visible {
            continue;
        }
        let Some(mesh) = &node.mesh else { continue };

        let (param_a, param_b, param_c) = match &mesh.shape {
            Shape::Sphere { radius } => (*radius, 0.0, 0.0),
            Shape::Ring { inner_radius, outer_radius, segments } => {
                (*inner_radius, *outer_radius, *segments as f32)
            }
            Shape::LineLoop { points } => match buffer.push_line(points) {
                Some((first, count)) => (first as f32, count as f32, 0.0),
                None => {
                    log::warn!(
                        "line vertex buffer full ({}); dropping {} ({} vertices)",
                        buffer.line_vertex_capacity(),
                        node.tag,
                        points.len()
                    );
                    continue;
                }
            },
        };

        let instance = RenderInstance {
            model: node.world.to_cols_array_2d(),
            kind: mesh.shape.kind_code(),
            texture: mesh.texture.map_or(-1.0, |slot| slot as f32),
            param_a,
            param_b,
            param_c,
            shading: match mesh.shading {
                Shading::Basic => 0.0,
                Shading::Standard => 1.0,
            },
            double_sided: if mesh.double_sided { 1.0 } else { 0.0 },
            body: node.body.map_or(-1.0, |b| b.index() as f32),
        };

        if !buffer.push(instance) {
            log::warn!("render buffer full ({}); dropping {}", buffer.capacity(), node.tag);
            break;
        }
    }
}
