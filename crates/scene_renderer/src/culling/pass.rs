//! Per-frame culling traversal
//!
//! The pass walks the scene graph depth first, parents before children, so
//! every node sees the mask its parent stored earlier in the same pass.

use crate::culling::config::{CullingConfig, ShapeClassification};
use crate::culling::mask::VisibilityMask;
use crate::culling::strategy::{CullingStrategy, FrustumCullingStrategy};
use crate::render::Camera;
use crate::scene::{Frustum, NodeId, SceneGraph};

/// Counters from one culling pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CullingStats {
    /// Nodes visited
    pub visited: usize,
    /// Nodes marked invisible
    pub culled: usize,
    /// Nodes settled by an inside/outside parent without plane tests
    pub propagated: usize,
    /// Nodes without render bounds
    pub unbounded: usize,
}

impl CullingStats {
    /// Nodes left visible
    pub fn visible(&self) -> usize {
        self.visited - self.culled
    }
}

/// Runs a culling strategy over a scene graph once per frame
///
/// The pass owns its strategy; the camera is passed in on every run.
#[derive(Debug)]
pub struct CullingPass<S = FrustumCullingStrategy> {
    strategy: S,
    enabled: bool,
}

impl CullingPass<FrustumCullingStrategy> {
    /// Frustum culling pass built from configuration
    pub fn from_config(config: &CullingConfig) -> Self {
        let mut pass = Self::new(FrustumCullingStrategy::new(ShapeClassification::from(config)));
        pass.set_enabled(config.enabled);
        pass
    }
}

impl Default for CullingPass<FrustumCullingStrategy> {
    fn default() -> Self {
        Self::from_config(&CullingConfig::default())
    }
}

impl<S: CullingStrategy> CullingPass<S> {
    /// Create an enabled pass around a strategy
    pub fn new(strategy: S) -> Self {
        Self { strategy, enabled: true }
    }

    /// Strategy in use
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Whether culling is applied at all
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn culling on or off globally
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Cull the scene against the camera's current frustum
    pub fn run(&self, graph: &mut SceneGraph, camera: &Camera) -> CullingStats {
        let frustum = camera.frustum();
        self.run_with_frustum(graph, &frustum)
    }

    /// Cull the scene against an explicit frustum
    ///
    /// Stale render bounds are refreshed first.
    pub fn run_with_frustum(&self, graph: &mut SceneGraph, frustum: &Frustum) -> CullingStats {
        if graph.refresh_render_bounds() {
            log::trace!("Render bounds refreshed before culling");
        }

        let mut stats = CullingStats::default();
        let planes = frustum.planes();

        let mut stack: Vec<(NodeId, VisibilityMask)> = graph
            .roots()
            .iter()
            .rev()
            .map(|&root| (root, VisibilityMask::INDETERMINATE))
            .collect();

        while let Some((id, parent_mask)) = stack.pop() {
            let Some(node) = graph.node_mut(id) else {
                continue;
            };
            stats.visited += 1;

            let mask = if self.enabled {
                if node.cullable.enable {
                    if node.render_bounds().is_none() {
                        stats.unbounded += 1;
                    } else if parent_mask.is_resolved() {
                        stats.propagated += 1;
                    }
                }
                self.strategy.evaluate(node, parent_mask, planes)
            } else {
                node.cullable.visible = true;
                node.cullable.visibility_plane_mask = VisibilityMask::INDETERMINATE;
                VisibilityMask::INDETERMINATE
            };

            if !node.cullable.visible {
                stats.culled += 1;
            }
            stack.extend(node.children().iter().rev().map(|&child| (child, mask)));
        }

        log::debug!(
            "Culling pass: {} visited, {} visible, {} culled, {} propagated, {} unbounded",
            stats.visited,
            stats.visible(),
            stats.culled,
            stats.propagated,
            stats.unbounded
        );
        stats
    }
}
