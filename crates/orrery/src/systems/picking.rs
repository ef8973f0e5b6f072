//! Ray picking against body meshes.

use glam::Vec3;

use crate::api::types::NodeId;
use crate::bodies::BodyId;
use crate::core::scene::SceneGraph;
use crate::renderer::camera::Ray;

/// Closest pickable body under a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub body: BodyId,
    pub node: NodeId,
    /// World-space centre of the hit body.
    pub center: Vec3,
    /// Distance along the ray to the hit surface.
    pub distance: f32,
}

/// Cast `ray` against every visible, pickable sphere tagged with a body.
///
/// Rings, path guides and the star are never candidates. World positions are
/// taken from the last propagate; the sphere radius is scaled by the node's
/// largest world scale axis.
pub fn pick(graph: &SceneGraph, ray: &Ray) -> Option<PickHit> {
    let mut best: Option<PickHit> = None;

    for node in graph.iter() {
        if !node.pickable || !node.visible {
            continue;
        }
        let (Some(body), Some(mesh)) = (node.body, node.mesh.as_ref()) else { continue };
        let Some(radius) = mesh.sphere_radius() else { continue };

        let (scale, _, center) = node.world.to_scale_rotation_translation();
        let radius = radius * scale.max_element();
        let Some(distance) = ray.intersect_sphere(center, radius) else { continue };

        if best.map_or(true, |b| distance < b.distance) {
            best = Some(PickHit { body, node: node.id, center, distance });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::OrreryConfig;
    use crate::assets::manifest::TextureManifest;
    use crate::bodies::BodyRegistry;
    use crate::options::DisplayOptions;
    use crate::renderer::camera::PerspectiveCamera;
    use crate::systems::builder::{build_system, SystemLayout};

    fn scene() -> (SceneGraph, SystemLayout) {
        let registry = BodyRegistry::solar_system();
        let mut graph = SceneGraph::new();
        let layout = build_system(
            &mut graph,
            &registry,
            &DisplayOptions::default(),
            &OrreryConfig::default(),
            &TextureManifest::default(),
        )
        .unwrap();
        (graph, layout)
    }

    #[test]
    fn ray_at_a_planet_picks_it() {
        let (graph, _) = scene();
        // Straight down onto Mars at (78, 0, 0).
        let ray = Ray::new(Vec3::new(78.0, 200.0, 0.0), Vec3::NEG_Y);
        let hit = pick(&graph, &ray).unwrap();
        assert_eq!(hit.body, BodyId::Mars);
        assert!((hit.distance - 196.0).abs() < 1e-3);
        assert!((hit.center - Vec3::new(78.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn nearest_body_wins() {
        let (graph, _) = scene();
        // Along +X from outside Pluto's orbit: Pluto (216) is hit before Neptune (200).
        let ray = Ray::new(Vec3::new(400.0, 0.0, 0.0), Vec3::NEG_X);
        assert_eq!(pick(&graph, &ray).unwrap().body, BodyId::Pluto);
    }

    #[test]
    fn star_rings_and_paths_are_ignored() {
        let (graph, _) = scene();
        // Through the sun only.
        let ray = Ray::new(Vec3::new(0.0, 200.0, 0.0), Vec3::NEG_Y);
        assert!(pick(&graph, &ray).is_none());
        // Through Saturn's ring but outside the planet (ring spans 10..20 around x = 138).
        let ray = Ray::new(Vec3::new(138.0, 200.0, 15.0), Vec3::NEG_Y);
        assert!(pick(&graph, &ray).is_none());
    }

    #[test]
    fn empty_space_picks_nothing() {
        let (graph, _) = scene();
        let ray = Ray::new(Vec3::new(0.0, 500.0, 0.0), Vec3::Y);
        assert!(pick(&graph, &ray).is_none());
    }

    #[test]
    fn moon_is_pickable() {
        let (graph, _) = scene();
        let ray = Ray::new(Vec3::new(70.0, 100.0, 0.0), Vec3::NEG_Y);
        assert_eq!(pick(&graph, &ray).unwrap().body, BodyId::Moon);
    }

    #[test]
    fn camera_click_at_projected_earth_picks_earth() {
        let (graph, layout) = scene();
        let camera = PerspectiveCamera::default();
        let earth = graph.world_position(layout.body_mesh(BodyId::Earth).unwrap()).unwrap();
        let screen = camera.world_to_screen(earth).unwrap();
        let hit = pick(&graph, &camera.screen_ray(screen.x, screen.y)).unwrap();
        assert_eq!(hit.body, BodyId::Earth);
    }
}
