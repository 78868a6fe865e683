//! Scene graph arena
//!
//! Display objects live in a slot map keyed by [`NodeId`]. Every node owns
//! its ordered list of children; the `parent` link is a plain key used for
//! lookups only, so the tree has no reference cycles and removing a node
//! drops its whole subtree.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::culling::mask::VisibilityMask;
use crate::scene::bounds::AABB;

slotmap::new_key_type! {
    /// Handle to a node in a [`SceneGraph`]
    pub struct NodeId;
}

/// Kind of display object a node renders
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Container with no geometry of its own
    Group,
    /// Circle
    Circle,
    /// Ellipse
    Ellipse,
    /// Bitmap image
    Image,
    /// Rectangle
    Rect,
    /// Single line segment
    Line,
    /// Open polyline
    Polyline,
    /// Closed polygon
    Polygon,
    /// Text run
    Text,
    /// Arbitrary path
    Path,
    /// Embedded HTML element
    Html,
    /// 3D mesh
    Mesh,
    /// Application-defined kind
    Custom(String),
}

impl ShapeKind {
    /// Kinds that render flat and ignore depth by default
    pub fn default_2d() -> Vec<ShapeKind> {
        vec![
            ShapeKind::Circle,
            ShapeKind::Ellipse,
            ShapeKind::Image,
            ShapeKind::Rect,
            ShapeKind::Line,
            ShapeKind::Polyline,
            ShapeKind::Polygon,
            ShapeKind::Text,
            ShapeKind::Path,
            ShapeKind::Html,
        ]
    }
}

/// Per-node visibility state written by the culling pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cullable {
    /// Whether culling applies to this node at all
    pub enable: bool,
    /// Planes this node still straddles, or a resolved inside/outside state
    pub visibility_plane_mask: VisibilityMask,
    /// Resolved decision the renderer honors
    pub visible: bool,
}

impl Default for Cullable {
    fn default() -> Self {
        Self {
            enable: true,
            visibility_plane_mask: VisibilityMask::INDETERMINATE,
            visible: true,
        }
    }
}

/// A display object in the scene graph
#[derive(Debug, Clone)]
pub struct SceneNode {
    name: String,
    kind: ShapeKind,
    /// Visibility state, updated once per frame by the culling pass
    pub cullable: Cullable,
    geometry_bounds: Option<AABB>,
    render_bounds: Option<AABB>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    fn new(name: String, kind: ShapeKind, parent: Option<NodeId>) -> Self {
        Self {
            name,
            kind,
            cullable: Cullable::default(),
            geometry_bounds: None,
            render_bounds: None,
            parent,
            children: Vec::new(),
        }
    }

    /// Debug name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shape kind
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// World-space bounds of this node's own geometry
    pub fn geometry_bounds(&self) -> Option<&AABB> {
        self.geometry_bounds.as_ref()
    }

    /// World-space bounds of this node and its whole subtree
    ///
    /// Refreshed by [`SceneGraph::update_render_bounds`] or, after structural
    /// or geometry edits, by [`SceneGraph::refresh_render_bounds`]. `None`
    /// when nothing in the subtree has geometry.
    pub fn render_bounds(&self) -> Option<&AABB> {
        self.render_bounds.as_ref()
    }

    /// Parent node, `None` for roots
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in draw order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Scene graph errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Handle does not refer to a live node
    #[error("node {0:?} does not exist")]
    NodeNotFound(NodeId),

    /// Reparenting would make a node its own ancestor
    #[error("cannot move node {node:?} under its own descendant {new_parent:?}")]
    CycleDetected {
        /// Node being moved
        node: NodeId,
        /// Requested parent
        new_parent: NodeId,
    },
}

/// Hierarchy of display objects with per-node culling state
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, SceneNode>,
    roots: Vec<NodeId>,
    bounds_dirty: bool,
}

impl SceneGraph {
    /// Create a new empty scene graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level node
    pub fn add_root(&mut self, name: impl Into<String>, kind: ShapeKind) -> NodeId {
        let id = self.nodes.insert(SceneNode::new(name.into(), kind, None));
        self.roots.push(id);
        self.bounds_dirty = true;
        id
    }

    /// Add a node as the last child of `parent`
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        kind: ShapeKind,
    ) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let id = self.nodes.insert(SceneNode::new(name.into(), kind, Some(parent)));
        self.nodes[parent].children.push(id);
        self.bounds_dirty = true;
        Ok(id)
    }

    /// Remove a node and its whole subtree
    pub fn remove(&mut self, id: NodeId) -> Result<(), SceneError> {
        let parent = self.get(id)?.parent;
        self.detach(id, parent);

        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(next) {
                pending.extend(node.children);
            }
        }
        self.bounds_dirty = true;
        Ok(())
    }

    /// Move a node (with its subtree) under a new parent, or to the root list
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> Result<(), SceneError> {
        let old_parent = self.get(id)?.parent;
        if let Some(target) = new_parent {
            if !self.nodes.contains_key(target) {
                return Err(SceneError::NodeNotFound(target));
            }
            if target == id || self.is_ancestor(id, target) {
                return Err(SceneError::CycleDetected { node: id, new_parent: target });
            }
        }

        self.detach(id, old_parent);
        self.nodes[id].parent = new_parent;
        match new_parent {
            Some(parent) => self.nodes[parent].children.push(id),
            None => self.roots.push(id),
        }
        self.bounds_dirty = true;
        Ok(())
    }

    fn detach(&mut self, id: NodeId, parent: Option<NodeId>) {
        let siblings = match parent {
            Some(parent) => &mut self.nodes[parent].children,
            None => &mut self.roots,
        };
        siblings.retain(|&child| child != id);
    }

    /// Whether `ancestor` lies on the parent chain of `node`
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Set the world-space bounds of a node's own geometry
    pub fn set_geometry_bounds(&mut self, id: NodeId, bounds: Option<AABB>) -> Result<(), SceneError> {
        self.get_mut(id)?.geometry_bounds = bounds;
        self.bounds_dirty = true;
        Ok(())
    }

    /// Opt a node in or out of culling
    pub fn set_culling_enabled(&mut self, id: NodeId, enable: bool) -> Result<(), SceneError> {
        self.get_mut(id)?.cullable.enable = enable;
        Ok(())
    }

    /// Look up a node
    pub fn get(&self, id: NodeId) -> Result<&SceneNode, SceneError> {
        self.nodes.get(id).ok_or(SceneError::NodeNotFound(id))
    }

    /// Look up a node mutably
    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut SceneNode, SceneError> {
        self.nodes.get_mut(id).ok_or(SceneError::NodeNotFound(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    /// Whether the handle refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Top-level nodes in draw order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, SceneError> {
        Ok(self.get(id)?.parent)
    }

    /// Children of a node
    pub fn children(&self, id: NodeId) -> Result<&[NodeId], SceneError> {
        Ok(self.get(id)?.children())
    }

    /// Mask a node inherits from its parent this frame
    ///
    /// Roots inherit [`VisibilityMask::INDETERMINATE`].
    pub fn parent_mask(&self, id: NodeId) -> Result<VisibilityMask, SceneError> {
        Ok(match self.get(id)?.parent {
            Some(parent) => self.get(parent)?.cullable.visibility_plane_mask,
            None => VisibilityMask::INDETERMINATE,
        })
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Remove every node
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
        self.bounds_dirty = false;
    }

    /// All nodes in depth-first pre-order (parents before children)
    pub fn iter_top_down(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter().rev().copied());
        }
        order
    }

    /// Whether an edit since the last bounds update left render bounds stale
    pub fn render_bounds_dirty(&self) -> bool {
        self.bounds_dirty
    }

    /// Recompute render bounds only if an edit made them stale
    ///
    /// Returns whether an update ran. The culling pass calls this before
    /// traversing, so it never tests against outdated bounds.
    pub fn refresh_render_bounds(&mut self) -> bool {
        if !self.bounds_dirty {
            return false;
        }
        self.update_render_bounds();
        true
    }

    /// Recompute every node's render bounds from the bottom up
    ///
    /// A node's render bounds are the union of its own geometry bounds and
    /// its children's render bounds.
    pub fn update_render_bounds(&mut self) {
        for id in self.iter_top_down().into_iter().rev() {
            let node = &self.nodes[id];
            let bounds = node
                .children
                .iter()
                .filter_map(|&child| self.nodes[child].render_bounds)
                .fold(node.geometry_bounds, |acc, child| match acc {
                    Some(acc) => Some(acc.union(&child)),
                    None => Some(child),
                });
            self.nodes[id].render_bounds = bounds;
        }
        self.bounds_dirty = false;
    }

    /// Nodes the renderer should draw, in draw order
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        self.iter_top_down()
            .into_iter()
            .filter(|&id| self.nodes[id].cullable.visible)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    fn unit_box(center: Vec3) -> AABB {
        AABB::from_center_half_extents(center, Vec3::new(0.5, 0.5, 0.5))
    }

    #[test]
    fn test_add_and_remove_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root("root", ShapeKind::Group);
        let group = graph.add_child(root, "group", ShapeKind::Group).unwrap();
        let leaf = graph.add_child(group, "leaf", ShapeKind::Rect).unwrap();
        let sibling = graph.add_child(root, "sibling", ShapeKind::Circle).unwrap();
        assert_eq!(graph.len(), 4);

        graph.remove(group).unwrap();
        assert_eq!(graph.len(), 2);
        assert!(!graph.contains(leaf));
        assert_eq!(graph.children(root).unwrap(), &[sibling]);
        assert_eq!(graph.get(leaf).unwrap_err(), SceneError::NodeNotFound(leaf));
    }

    #[test]
    fn test_add_child_to_missing_parent() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root("root", ShapeKind::Group);
        graph.remove(root).unwrap();
        assert_eq!(
            graph.add_child(root, "orphan", ShapeKind::Rect),
            Err(SceneError::NodeNotFound(root))
        );
        assert!(graph.roots().is_empty());
    }

    #[test]
    fn test_reparent_rejects_cycles() {
        let mut graph = SceneGraph::new();
        let a = graph.add_root("a", ShapeKind::Group);
        let b = graph.add_child(a, "b", ShapeKind::Group).unwrap();
        let c = graph.add_child(b, "c", ShapeKind::Group).unwrap();

        assert_eq!(
            graph.reparent(a, Some(c)),
            Err(SceneError::CycleDetected { node: a, new_parent: c })
        );
        assert!(graph.reparent(a, Some(a)).is_err());

        graph.reparent(c, None).unwrap();
        assert_eq!(graph.roots(), &[a, c]);
        assert!(graph.children(b).unwrap().is_empty());
        assert_eq!(graph.parent(c).unwrap(), None);

        graph.reparent(b, Some(c)).unwrap();
        assert!(graph.is_ancestor(c, b));
        assert!(!graph.is_ancestor(a, b));
    }

    #[test]
    fn test_iter_top_down_visits_parents_first() {
        let mut graph = SceneGraph::new();
        let r1 = graph.add_root("r1", ShapeKind::Group);
        let a = graph.add_child(r1, "a", ShapeKind::Group).unwrap();
        let a1 = graph.add_child(a, "a1", ShapeKind::Rect).unwrap();
        let b = graph.add_child(r1, "b", ShapeKind::Rect).unwrap();
        let r2 = graph.add_root("r2", ShapeKind::Mesh);

        assert_eq!(graph.iter_top_down(), vec![r1, a, a1, b, r2]);
    }

    #[test]
    fn test_render_bounds_union_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root("root", ShapeKind::Group);
        let left = graph.add_child(root, "left", ShapeKind::Rect).unwrap();
        let right = graph.add_child(root, "right", ShapeKind::Rect).unwrap();
        let empty = graph.add_child(root, "empty", ShapeKind::Group).unwrap();
        graph.set_geometry_bounds(left, Some(unit_box(Vec3::new(-2.0, 0.0, 0.0)))).unwrap();
        graph.set_geometry_bounds(right, Some(unit_box(Vec3::new(2.0, 1.0, 0.0)))).unwrap();

        graph.update_render_bounds();

        let bounds = graph.get(root).unwrap().render_bounds().copied().unwrap();
        assert_eq!(bounds.min(), Vec3::new(-2.5, -0.5, -0.5));
        assert_eq!(bounds.max(), Vec3::new(2.5, 1.5, 0.5));
        assert!(graph.get(empty).unwrap().render_bounds().is_none());
    }

    #[test]
    fn test_edits_mark_render_bounds_dirty() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root("root", ShapeKind::Group);
        let leaf = graph.add_child(root, "leaf", ShapeKind::Rect).unwrap();
        assert!(graph.render_bounds_dirty());

        graph.set_geometry_bounds(leaf, Some(unit_box(Vec3::new(4.0, 0.0, 0.0)))).unwrap();
        assert!(graph.refresh_render_bounds());
        assert!(!graph.render_bounds_dirty());
        assert!(!graph.refresh_render_bounds());

        graph.set_geometry_bounds(leaf, Some(unit_box(Vec3::zeros()))).unwrap();
        assert!(graph.render_bounds_dirty());
        graph.refresh_render_bounds();
        let bounds = graph.get(root).unwrap().render_bounds().copied().unwrap();
        assert_eq!(bounds.max(), Vec3::new(0.5, 0.5, 0.5));

        let other = graph.add_root("other", ShapeKind::Group);
        graph.refresh_render_bounds();
        graph.reparent(leaf, Some(other)).unwrap();
        assert!(graph.render_bounds_dirty());
        graph.refresh_render_bounds();
        assert!(graph.get(root).unwrap().render_bounds().is_none());
        assert!(graph.get(other).unwrap().render_bounds().is_some());

        graph.remove(leaf).unwrap();
        assert!(graph.render_bounds_dirty());
        graph.refresh_render_bounds();
        assert!(graph.get(other).unwrap().render_bounds().is_none());
    }

    #[test]
    fn test_root_inherits_indeterminate_mask() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root("root", ShapeKind::Group);
        let child = graph.add_child(root, "child", ShapeKind::Rect).unwrap();
        graph.get_mut(root).unwrap().cullable.visibility_plane_mask = VisibilityMask::Inside;

        assert_eq!(graph.parent_mask(root).unwrap(), VisibilityMask::INDETERMINATE);
        assert_eq!(graph.parent_mask(child).unwrap(), VisibilityMask::Inside);
    }

    #[test]
    fn test_shape_kind_serde_names() {
        let toml = toml::to_string(&ShapeKindList { kinds: vec![ShapeKind::Rect, ShapeKind::Mesh] }).unwrap();
        assert!(toml.contains("\"Rect\""));
        assert_eq!(ShapeKind::default_2d().len(), 10);
        assert!(!ShapeKind::default_2d().contains(&ShapeKind::Group));
    }

    #[derive(Serialize)]
    struct ShapeKindList {
        kinds: Vec<ShapeKind>,
    }
}
