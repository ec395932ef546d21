// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Arena scene graph.
//!
//! Nodes live in a slot arena addressed by generational [`NodeId`]s, so a
//! handle to a removed node never aliases a newer one. Every mesh counts as
//! one geometry and one material allocation; removal releases both, which
//! lets tests check that rebuilds leak nothing.

use core::fmt;

use glam::Mat4;
use plant_geom::{Aabb, Transform};
use plant_scene_port::{Color, Primitive};

use crate::EngineError;

/// Generational handle to a scene node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Geometry and material of a mesh node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshData {
    /// Geometry.
    pub primitive: Primitive,
    /// Material color.
    pub color: Color,
}

/// What a node is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeKind {
    /// The graph root.
    Root,
    /// Transform-only container.
    Group,
    /// Drawable mesh.
    Mesh(MeshData),
    /// Screen-space marker anchor (annotation pins).
    Marker,
}

/// One node of the graph.
#[derive(Clone, Debug)]
pub struct SceneNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Node payload.
    pub kind: NodeKind,
    /// Placement relative to the parent.
    pub transform: Transform,
    /// Own visibility flag; see [`SceneGraph::is_effectively_visible`].
    pub visible: bool,
    /// Whether pointer rays may hit this node's meshes.
    pub pickable: bool,
    /// Equipment tag (set on equipment roots and the ground plane).
    pub tag: Option<String>,
}

impl SceneNode {
    fn new(kind: NodeKind, transform: Transform, parent: Option<NodeId>) -> Self {
        Self {
            parent,
            children: Vec::new(),
            kind,
            transform,
            visible: true,
            pickable: true,
            tag: None,
        }
    }

    /// Parent handle (`None` for the root).
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child handles in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Mesh payload, if this is a mesh.
    pub const fn mesh(&self) -> Option<&MeshData> {
        match &self.kind {
            NodeKind::Mesh(m) => Some(m),
            _ => None,
        }
    }
}

/// Geometry/material allocation counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResourceStats {
    /// Geometries created.
    pub geometries_allocated: u64,
    /// Geometries released.
    pub geometries_released: u64,
    /// Materials created.
    pub materials_allocated: u64,
    /// Materials released.
    pub materials_released: u64,
}

impl ResourceStats {
    /// Geometries currently alive.
    pub const fn live_geometries(&self) -> u64 {
        self.geometries_allocated - self.geometries_released
    }

    /// Materials currently alive.
    pub const fn live_materials(&self) -> u64 {
        self.materials_allocated - self.materials_released
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    node: Option<SceneNode>,
}

/// Slot arena of [`SceneNode`]s under a single root.
#[derive(Clone, Debug)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    stats: ResourceStats,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Graph holding only the root.
    pub fn new() -> Self {
        let root = NodeId {
            index: 0,
            generation: 0,
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(SceneNode::new(NodeKind::Root, Transform::identity(), None)),
            }],
            free: Vec::new(),
            root,
            stats: ResourceStats::default(),
        }
    }

    /// Root handle.
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Allocation counters.
    pub const fn stats(&self) -> ResourceStats {
        self.stats
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Whether only the root remains.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Whether `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    /// Mutably borrow a node.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }

    fn require(&self, id: NodeId) -> Result<&SceneNode, EngineError> {
        self.node(id).ok_or(EngineError::UnknownNode(id))
    }

    fn insert(&mut self, parent: NodeId, kind: NodeKind, transform: Transform) -> Result<NodeId, EngineError> {
        self.require(parent)?;
        let node = SceneNode::new(kind, transform, Some(parent));
        let id = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = u32::try_from(self.slots.len()).map_err(|_| EngineError::ArenaFull)?;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 0,
            }
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        if matches!(kind, NodeKind::Mesh(_)) {
            self.stats.geometries_allocated += 1;
            self.stats.materials_allocated += 1;
        }
        Ok(id)
    }

    /// Adds a transform-only group under `parent`.
    pub fn add_group(&mut self, parent: NodeId, transform: Transform) -> Result<NodeId, EngineError> {
        self.insert(parent, NodeKind::Group, transform)
    }

    /// Adds a mesh under `parent`, allocating its geometry and material.
    pub fn add_mesh(
        &mut self,
        parent: NodeId,
        mesh: MeshData,
        transform: Transform,
    ) -> Result<NodeId, EngineError> {
        self.insert(parent, NodeKind::Mesh(mesh), transform)
    }

    /// Adds a marker anchor under `parent`.
    pub fn add_marker(&mut self, parent: NodeId, transform: Transform) -> Result<NodeId, EngineError> {
        self.insert(parent, NodeKind::Marker, transform)
    }

    /// Sets the node's own visibility flag.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<(), EngineError> {
        let node = self.node_mut(id).ok_or(EngineError::UnknownNode(id))?;
        node.visible = visible;
        Ok(())
    }

    /// Removes `id` and all its descendants, releasing mesh resources.
    /// Returns the number of nodes removed.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<usize, EngineError> {
        if id == self.root {
            return Err(EngineError::ProtectedNode(id));
        }
        let parent = self.require(id)?.parent;
        if let Some(p) = parent.and_then(|p| self.node_mut(p)) {
            p.children.retain(|c| *c != id);
        }
        let doomed = self.subtree(id);
        for victim in &doomed {
            let slot = &mut self.slots[victim.index as usize];
            if let Some(node) = slot.node.take() {
                if matches!(node.kind, NodeKind::Mesh(_)) {
                    self.stats.geometries_released += 1;
                    self.stats.materials_released += 1;
                }
            }
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(victim.index);
        }
        Ok(doomed.len())
    }

    /// Removes every child of `id`. Returns the number of nodes removed.
    pub fn clear_children(&mut self, id: NodeId) -> Result<usize, EngineError> {
        let children = self.require(id)?.children.clone();
        let mut removed = 0;
        for child in children {
            removed += self.remove_subtree(child)?;
        }
        Ok(removed)
    }

    /// `id` and its descendants in pre-order. Empty for a dead handle.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(node) = self.node(next) else {
                continue;
            };
            out.push(next);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Local-to-world matrix of `id`.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.node(id)?;
        let mut mat = node.transform.to_mat4();
        while let Some(parent) = node.parent {
            node = self.node(parent)?;
            mat = node.transform.to_mat4() * mat;
        }
        Some(mat)
    }

    /// Visible when the node and every ancestor are visible.
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            match self.node(current) {
                Some(node) if node.visible => cursor = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Nearest tag walking from `id` up to the root (inclusive).
    pub fn tag_of(&self, id: NodeId) -> Option<&str> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.node(current)?;
            if let Some(tag) = node.tag.as_deref() {
                return Some(tag);
            }
            cursor = node.parent;
        }
        None
    }

    /// World-space bounds of every mesh under `id`.
    pub fn world_bounds(&self, id: NodeId) -> Option<Aabb> {
        Aabb::union_all(self.subtree(id).into_iter().filter_map(|n| {
            let mesh = self.node(n)?.mesh()?;
            let world = self.world_matrix(n)?;
            Some(mesh.primitive.local_bounds().transformed(&world))
        }))
    }

    /// Every live mesh node, in arena order.
    pub fn meshes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            let node = slot.node.as_ref()?;
            node.mesh()?;
            let index = u32::try_from(i).ok()?;
            Some((
                NodeId {
                    index,
                    generation: slot.generation,
                },
                node,
            ))
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec3;

    fn cube() -> MeshData {
        MeshData {
            primitive: Primitive::Box {
                width: 2.0,
                height: 2.0,
                depth: 2.0,
            },
            color: Color::FALLBACK,
        }
    }

    #[test]
    fn removal_releases_every_mesh_in_subtree() {
        let mut g = SceneGraph::new();
        let group = g.add_group(g.root(), Transform::identity()).unwrap();
        g.add_mesh(group, cube(), Transform::identity()).unwrap();
        g.add_mesh(group, cube(), Transform::identity()).unwrap();
        assert_eq!(g.stats().live_geometries(), 2);

        assert_eq!(g.remove_subtree(group).unwrap(), 3);
        assert_eq!(g.stats().live_geometries(), 0);
        assert_eq!(g.stats().live_materials(), 0);
        assert!(g.is_empty());
        assert!(g.node(g.root()).unwrap().children().is_empty());
    }

    #[test]
    fn stale_handles_do_not_alias_reused_slots() {
        let mut g = SceneGraph::new();
        let a = g.add_group(g.root(), Transform::identity()).unwrap();
        g.remove_subtree(a).unwrap();
        let b = g.add_group(g.root(), Transform::identity()).unwrap();
        assert_ne!(a, b);
        assert!(!g.contains(a));
        assert!(matches!(g.set_visible(a, false), Err(EngineError::UnknownNode(_))));
    }

    #[test]
    fn world_matrix_composes_parents() {
        let mut g = SceneGraph::new();
        let group = g
            .add_group(g.root(), Transform::from_translation(Vec3::new(10.0, 0.0, 0.0)))
            .unwrap();
        let mesh = g
            .add_mesh(group, cube(), Transform::from_translation(Vec3::new(0.0, 1.0, 0.0)))
            .unwrap();
        let p = g.world_matrix(mesh).unwrap().transform_point3(Vec3::ZERO);
        assert_relative_eq!(p.x, 10.0);
        assert_relative_eq!(p.y, 1.0);

        let b = g.world_bounds(group).unwrap();
        assert_relative_eq!(b.min().y, 0.0);
        assert_relative_eq!(b.max().x, 11.0);
    }

    #[test]
    fn hidden_ancestor_hides_descendants() {
        let mut g = SceneGraph::new();
        let group = g.add_group(g.root(), Transform::identity()).unwrap();
        let mesh = g.add_mesh(group, cube(), Transform::identity()).unwrap();
        g.node_mut(group).unwrap().tag = Some("tank-01".into());
        assert!(g.is_effectively_visible(mesh));
        assert_eq!(g.tag_of(mesh), Some("tank-01"));
        g.set_visible(group, false).unwrap();
        assert!(!g.is_effectively_visible(mesh));
    }

    #[test]
    fn root_cannot_be_removed() {
        let mut g = SceneGraph::new();
        let root = g.root();
        assert!(matches!(g.remove_subtree(root), Err(EngineError::ProtectedNode(_))));
    }
}
