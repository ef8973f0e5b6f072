use std::f32::consts::TAU;

use glam::{Mat4, Quat, Vec3};

use crate::api::types::NodeId;
use crate::bodies::BodyId;
use crate::components::mesh::MeshComponent;

/// Transform of a node relative to its parent.
///
/// Rotation is split into a fixed `tilt` and an accumulated `angle` about the
/// node's local Y axis, composed as `tilt * rot_y(angle)` (a local-frame
/// rotate, the same as repeatedly calling `rotateY` on a scene object).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    pub translation: Vec3,
    pub tilt: Quat,
    /// Radians in `[0, TAU)`.
    pub angle: f32,
    pub scale: Vec3,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            tilt: Quat::IDENTITY,
            angle: 0.0,
            scale: Vec3::ONE,
        }
    }
}

impl LocalTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_tilt(mut self, tilt: Quat) -> Self {
        self.tilt = tilt;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle.rem_euclid(TAU);
        self
    }

    /// Advance the rotation about local Y. The angle wraps at a full turn.
    #[inline]
    pub fn rotate_y(&mut self, delta: f32) {
        self.angle = (self.angle + delta).rem_euclid(TAU);
    }

    pub fn rotation(&self) -> Quat {
        self.tilt * Quat::from_rotation_y(self.angle)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation(), self.translation)
    }
}

/// A node in the scene graph: a transform with optional geometry.
///
/// Orbit pivots are nodes without a mesh; body meshes, rings and path guides
/// carry a [`MeshComponent`].
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: NodeId,
    /// Debug name, e.g. `"earth.orbit"`.
    pub tag: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub local: LocalTransform,
    /// Cached world matrix, refreshed by `SceneGraph::propagate`.
    pub world: Mat4,
    pub visible: bool,
    pub mesh: Option<MeshComponent>,
    /// Body this node represents. Set on body meshes and used for picking.
    pub body: Option<BodyId>,
    /// Whether ray picks may hit this node.
    pub pickable: bool,
}

impl SceneNode {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            tag: String::new(),
            parent: None,
            children: Vec::new(),
            local: LocalTransform::default(),
            world: Mat4::IDENTITY,
            visible: true,
            mesh: None,
            body: None,
            pickable: false,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_local(mut self, local: LocalTransform) -> Self {
        self.local = local;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshComponent) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_body(mut self, body: BodyId) -> Self {
        self.body = Some(body);
        self
    }

    pub fn pickable(mut self) -> Self {
        self.pickable = true;
        self
    }

    /// World-space origin of this node.
    pub fn world_position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }
}
