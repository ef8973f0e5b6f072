//! Scene construction: turns the body registry into a node hierarchy.
//!
//! Layout per planet:
//!
//! ```text
//! <name>.orbit          pivot at the origin, revolves about Y
//! ├── <name>            body mesh at (distance, 0, 0), spins about Y
//! ├── <name>.ring       optional, same offset, tilted flat
//! └── <satellite>.orbit pivot at the body's offset (satellites only)
//!     └── <satellite>   body mesh at (satellite distance, 0, 0)
//! <name>.path           closed loop of radius `distance` at the origin
//! ```

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Quat, Vec3};

use crate::api::config::OrreryConfig;
use crate::api::types::NodeId;
use crate::assets::manifest::TextureManifest;
use crate::bodies::{BodyDescriptor, BodyId, BodyKind, BodyRegistry};
use crate::components::mesh::{MeshComponent, Shading};
use crate::components::node::{LocalTransform, SceneNode};
use crate::core::scene::SceneGraph;
use crate::error::{OrreryError, Result};
use crate::options::DisplayOptions;

/// Node handles for one planet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetNodes {
    pub body: BodyId,
    /// Revolves the body around the origin.
    pub orbit: NodeId,
    pub mesh: NodeId,
    pub ring: Option<NodeId>,
    pub path: NodeId,
}

/// Node handles for a satellite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatelliteNodes {
    pub body: BodyId,
    pub parent: BodyId,
    /// Sits at the parent body's position and revolves the satellite around it.
    pub pivot: NodeId,
    pub mesh: NodeId,
}

/// Handles into a graph produced by [`build_system`].
#[derive(Debug, Clone, PartialEq)]
pub struct SystemLayout {
    pub star: NodeId,
    pub planets: Vec<PlanetNodes>,
    pub satellites: Vec<SatelliteNodes>,
}

impl SystemLayout {
    /// Mesh node of any body.
    pub fn body_mesh(&self, id: BodyId) -> Option<NodeId> {
        if id == BodyId::Sun {
            return Some(self.star);
        }
        self.planets
            .iter()
            .find(|p| p.body == id)
            .map(|p| p.mesh)
            .or_else(|| self.satellites.iter().find(|s| s.body == id).map(|s| s.mesh))
    }

    pub fn planet(&self, id: BodyId) -> Option<&PlanetNodes> {
        self.planets.iter().find(|p| p.body == id)
    }

    pub fn paths(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.planets.iter().map(|p| p.path)
    }

    /// Show or hide every path guide at once. Shapes are untouched.
    pub fn set_paths_visible(&self, graph: &mut SceneGraph, visible: bool) {
        for path in self.paths() {
            if let Some(node) = graph.get_mut(path) {
                node.visible = visible;
            }
        }
    }
}

/// `samples` evenly spaced points on a circle of `radius` in the XZ plane.
pub fn circle_points(radius: f32, samples: u32) -> Vec<Vec3> {
    let samples = samples.max(3);
    (0..samples)
        .map(|i| {
            let angle = i as f32 / samples as f32 * TAU;
            Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
        })
        .collect()
}

fn body_mesh(body: &BodyDescriptor, shading: Shading, textures: &TextureManifest) -> MeshComponent {
    let mut mesh = MeshComponent::sphere(body.mean_radius).with_shading(shading);
    match textures.slot(body.texture_key) {
        Some(slot) => mesh = mesh.with_texture(slot),
        None => log::warn!("no texture for {}; rendering untextured", body.name),
    }
    mesh
}

fn offset(distance: f32) -> LocalTransform {
    LocalTransform::new().with_translation(Vec3::new(distance, 0.0, 0.0))
}

/// Populate an empty graph with the star, planets, rings, path guides and satellites.
///
/// Not re-entrant: a graph that already holds nodes is rejected with
/// [`OrreryError::SceneAlreadyBuilt`]. Call [`SceneGraph::clear`] first to rebuild.
pub fn build_system(
    graph: &mut SceneGraph,
    registry: &BodyRegistry,
    options: &DisplayOptions,
    config: &OrreryConfig,
    textures: &TextureManifest,
) -> Result<SystemLayout> {
    if !graph.is_empty() {
        return Err(OrreryError::SceneAlreadyBuilt);
    }

    let sun = registry.star();
    let star = graph.spawn(
        SceneNode::new(NodeId(0))
            .with_tag(sun.name.to_ascii_lowercase())
            .with_mesh(body_mesh(sun, Shading::Basic, textures))
            .with_body(sun.id),
    );

    let mut planets = Vec::new();
    for body in registry.planets() {
        let name = body.name.to_ascii_lowercase();

        let orbit = graph.spawn(SceneNode::new(NodeId(0)).with_tag(format!("{}.orbit", name)));
        let mesh = graph.spawn_child(
            orbit,
            SceneNode::new(NodeId(0))
                .with_tag(name.clone())
                .with_local(offset(body.orbital_distance))
                .with_mesh(body_mesh(body, Shading::Standard, textures))
                .with_body(body.id)
                .pickable(),
        )?;

        let ring = match body.ring {
            Some(spec) => {
                let mut mesh =
                    MeshComponent::ring(spec.inner_radius, spec.outer_radius, config.ring_segments);
                if let Some(slot) = textures.slot(spec.texture) {
                    mesh = mesh.with_texture(slot);
                }
                let local = offset(body.orbital_distance).with_tilt(Quat::from_rotation_x(-FRAC_PI_2));
                Some(graph.spawn_child(
                    orbit,
                    SceneNode::new(NodeId(0))
                        .with_tag(format!("{}.ring", name))
                        .with_local(local)
                        .with_mesh(mesh),
                )?)
            }
            None => None,
        };

        let path = graph.spawn(
            SceneNode::new(NodeId(0))
                .with_tag(format!("{}.path", name))
                .with_mesh(MeshComponent::line_loop(circle_points(
                    body.orbital_distance,
                    config.path_samples,
                ))),
        );
        if let Some(node) = graph.get_mut(path) {
            node.visible = options.show_path();
        }

        planets.push(PlanetNodes { body: body.id, orbit, mesh, ring, path });
    }

    let mut satellites = Vec::new();
    for body in registry.satellites() {
        let BodyKind::Satellite { parent } = body.kind else { continue };
        let Some(host) = planets.iter().find(|p| p.body == parent) else {
            log::warn!("{} orbits {:?}, which has no orbit node; skipped", body.name, parent);
            continue;
        };
        let name = body.name.to_ascii_lowercase();
        let parent_distance = registry.get(parent).orbital_distance;

        let pivot = graph.spawn_child(
            host.orbit,
            SceneNode::new(NodeId(0))
                .with_tag(format!("{}.orbit", name))
                .with_local(offset(parent_distance)),
        )?;
        let mesh = graph.spawn_child(
            pivot,
            SceneNode::new(NodeId(0))
                .with_tag(name)
                .with_local(offset(body.orbital_distance))
                .with_mesh(body_mesh(body, Shading::Standard, textures))
                .with_body(body.id)
                .pickable(),
        )?;
        satellites.push(SatelliteNodes { body: body.id, parent, pivot, mesh });
    }

    graph.propagate();
    log::info!(
        "solar system built: {} nodes, {} planets, {} satellites",
        graph.len(),
        planets.len(),
        satellites.len()
    );

    Ok(SystemLayout { star, planets, satellites })
}
