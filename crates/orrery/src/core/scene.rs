use glam::{Mat4, Vec3};

use crate::api::types::NodeId;
use crate::components::node::{LocalTransform, SceneNode};
use crate::error::{OrreryError, Result};

/// Flat node storage plus parent/child links.
///
/// Node ids are indices into the storage and stay valid for the life of the
/// graph; nodes are never removed individually, only all at once by [`clear`](Self::clear).
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    /// Nodes with no parent (top-level).
    roots: Vec<NodeId>,
    /// Set when a local transform or link changes, cleared after propagate.
    dirty: bool,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            roots: Vec::new(),
            dirty: false,
        }
    }

    /// Add a top-level node. Any id or links on `node` are replaced.
    pub fn spawn(&mut self, mut node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        node.id = id;
        node.parent = None;
        node.children.clear();
        self.nodes.push(node);
        self.roots.push(id);
        self.dirty = true;
        id
    }

    /// Add a node as the last child of `parent`.
    pub fn spawn_child(&mut self, parent: NodeId, node: SceneNode) -> Result<NodeId> {
        if self.get(parent).is_none() {
            return Err(OrreryError::InvalidNode(parent));
        }
        let id = self.spawn(node);
        self.set_parent(id, Some(parent))?;
        Ok(id)
    }

    /// Re-link `child` under `parent`, or make it a root with `None`.
    /// Rejects links that would create a cycle.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) -> Result<()> {
        if self.get(child).is_none() {
            return Err(OrreryError::InvalidNode(child));
        }
        if let Some(p) = parent {
            if self.get(p).is_none() || self.is_ancestor(child, p) {
                return Err(OrreryError::InvalidNode(p));
            }
        }

        // Remove from old parent's children
        if let Some(old) = self.nodes[child.index()].parent {
            self.nodes[old.index()].children.retain(|&c| c != child);
        }

        self.nodes[child.index()].parent = parent;

        match parent {
            Some(p) => {
                self.nodes[p.index()].children.push(child);
                self.roots.retain(|&r| r != child);
            }
            None => {
                if !self.roots.contains(&child) {
                    self.roots.push(child);
                }
            }
        }

        self.dirty = true;
        Ok(())
    }

    /// Whether `ancestor` is `node` itself or lies on its parent chain.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.get(id).and_then(|n| n.parent);
        }
        false
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.index())
    }

    /// Mutable access to a node. Marks the graph dirty.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.dirty = true;
        self.nodes.get_mut(id.index())
    }

    /// Mutable access to a node's local transform. Marks the graph dirty.
    pub fn local_mut(&mut self, id: NodeId) -> Option<&mut LocalTransform> {
        self.dirty = true;
        self.nodes.get_mut(id.index()).map(|n| &mut n.local)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter()
    }

    /// World-space position of a node, as of the last propagate.
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.get(id).map(SceneNode::world_position)
    }

    /// Recompute every node's world matrix from the roots down.
    pub fn propagate(&mut self) {
        if !self.dirty {
            return;
        }

        let mut stack: Vec<(NodeId, Mat4)> = self
            .roots
            .iter()
            .rev()
            .map(|&root| (root, Mat4::IDENTITY))
            .collect();

        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id.index()) else { continue };
            node.world = parent_world * node.local.matrix();
            let world = node.world;
            for &child in node.children.iter().rev() {
                stack.push((child, world));
            }
        }

        self.dirty = false;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node. Ids handed out before this call become invalid.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
        self.dirty = false;
    }
}
