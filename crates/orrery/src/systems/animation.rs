//! Animation driver: advances every revolution and spin by one frame.

use crate::bodies::BodyRegistry;
use crate::core::scene::SceneGraph;
use crate::options::DisplayOptions;
use crate::systems::builder::SystemLayout;

/// Advance the system by one rendered frame and refresh world matrices.
///
/// Rates are radians per frame, scaled by the speed multiplier, except the
/// satellite orbits, which always advance at their fixed rate. Missing nodes
/// are skipped; this never fails.
pub fn advance_frame(
    graph: &mut SceneGraph,
    layout: &SystemLayout,
    registry: &BodyRegistry,
    options: &DisplayOptions,
) {
    let speed = options.speed();

    if let Some(star) = graph.local_mut(layout.star) {
        star.rotate_y(speed * registry.star().spin_rate);
    }

    for planet in &layout.planets {
        let body = registry.get(planet.body);
        if let Some(orbit) = graph.local_mut(planet.orbit) {
            orbit.rotate_y(speed * body.orbital_rate);
        }
        if let Some(mesh) = graph.local_mut(planet.mesh) {
            mesh.rotate_y(speed * body.spin_rate);
        }
    }

    for satellite in &layout.satellites {
        let body = registry.get(satellite.body);
        if let Some(pivot) = graph.local_mut(satellite.pivot) {
            pivot.rotate_y(body.orbital_rate);
        }
    }

    graph.propagate();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::OrreryConfig;
    use crate::assets::manifest::TextureManifest;
    use crate::bodies::BodyId;
    use crate::options::SpeedBounds;
    use crate::systems::builder::build_system;
    use std::f32::consts::TAU;

    fn setup(speed: f32) -> (SceneGraph, SystemLayout, BodyRegistry, DisplayOptions) {
        let registry = BodyRegistry::solar_system();
        let options = DisplayOptions::new(SpeedBounds::new(20.0), true, true, speed);
        let mut graph = SceneGraph::new();
        let layout = build_system(
            &mut graph,
            &registry,
            &options,
            &OrreryConfig::default(),
            &TextureManifest::default(),
        )
        .unwrap();
        (graph, layout, registry, options)
    }

    fn angle(graph: &SceneGraph, id: crate::api::types::NodeId) -> f32 {
        graph.get(id).unwrap().local.angle
    }

    fn wrapped_diff(after: f32, before: f32) -> f32 {
        (after - before).rem_euclid(TAU)
    }

    #[test]
    fn each_frame_adds_speed_times_rate() {
        let (mut graph, layout, registry, options) = setup(3.0);
        for _ in 0..5 {
            let before: Vec<(f32, f32)> = layout
                .planets
                .iter()
                .map(|p| (angle(&graph, p.orbit), angle(&graph, p.mesh)))
                .collect();
            advance_frame(&mut graph, &layout, &registry, &options);
            for (planet, (orbit_before, spin_before)) in layout.planets.iter().zip(before) {
                let body = registry.get(planet.body);
                let orbit_step = wrapped_diff(angle(&graph, planet.orbit), orbit_before);
                let spin_step = wrapped_diff(angle(&graph, planet.mesh), spin_before);
                assert!((orbit_step - 3.0 * body.orbital_rate).abs() < 1e-5, "{:?}", planet.body);
                assert!((spin_step - 3.0 * body.spin_rate).abs() < 1e-5, "{:?}", planet.body);
            }
        }
    }

    #[test]
    fn star_spins_with_speed() {
        let (mut graph, layout, registry, options) = setup(2.0);
        advance_frame(&mut graph, &layout, &registry, &options);
        assert!((angle(&graph, layout.star) - 0.008).abs() < 1e-6);
    }

    #[test]
    fn zero_speed_freezes_planets_but_not_the_moon() {
        let (mut graph, layout, registry, options) = setup(0.0);
        for _ in 0..10 {
            advance_frame(&mut graph, &layout, &registry, &options);
        }
        for planet in &layout.planets {
            assert_eq!(angle(&graph, planet.orbit), 0.0);
            assert_eq!(angle(&graph, planet.mesh), 0.0);
        }
        assert_eq!(angle(&graph, layout.star), 0.0);

        let moon = layout.satellites[0];
        assert!((angle(&graph, moon.pivot) - 0.1).abs() < 1e-5);
    }

    #[test]
    fn moon_follows_earth_while_orbiting() {
        let (mut graph, layout, registry, options) = setup(20.0);
        let earth = layout.body_mesh(BodyId::Earth).unwrap();
        let moon = layout.body_mesh(BodyId::Moon).unwrap();
        for _ in 0..250 {
            advance_frame(&mut graph, &layout, &registry, &options);
            let d = graph
                .world_position(earth)
                .unwrap()
                .distance(graph.world_position(moon).unwrap());
            assert!((d - 8.0).abs() < 1e-3, "moon drifted to {}", d);
        }
    }

    #[test]
    fn angles_stay_wrapped() {
        let (mut graph, layout, registry, options) = setup(20.0);
        for _ in 0..2_000 {
            advance_frame(&mut graph, &layout, &registry, &options);
        }
        for node in graph.iter() {
            assert!((0.0..TAU).contains(&node.local.angle), "{} = {}", node.tag, node.local.angle);
        }
    }
}
