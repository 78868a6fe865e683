//! Culling strategies
//!
//! A strategy decides a single node's visibility given the mask its parent
//! resolved earlier in the same pass. The traversal order is owned by
//! [`CullingPass`](super::CullingPass); strategies never look at siblings or
//! children.

use crate::culling::config::ShapeClassification;
use crate::culling::mask::{PlaneMask, VisibilityMask};
use crate::scene::{is_depth_plane, Plane, SceneNode, AABB};

/// Per-node visibility decision
pub trait CullingStrategy {
    /// Decide a node's visibility and store it on the node's [`Cullable`]
    ///
    /// `parent_mask` is the mask the parent stored during this pass, or
    /// [`VisibilityMask::INDETERMINATE`] for roots. The returned mask is the
    /// one the node's children must receive.
    ///
    /// [`Cullable`]: crate::scene::Cullable
    fn evaluate(&self, node: &mut SceneNode, parent_mask: VisibilityMask, planes: &[Plane]) -> VisibilityMask;
}

/// Hierarchical frustum culling with plane coherency
///
/// Nodes under a parent that is fully inside or fully outside inherit that
/// state without testing. Otherwise only the planes the parent still
/// straddles are tested, and 2D shapes skip the near and far planes.
#[derive(Debug, Clone, Default)]
pub struct FrustumCullingStrategy {
    shapes: ShapeClassification,
}

impl FrustumCullingStrategy {
    /// Create a strategy with a shape classification
    pub fn new(shapes: ShapeClassification) -> Self {
        Self { shapes }
    }

    /// Shape classification in use
    pub fn shapes(&self) -> &ShapeClassification {
        &self.shapes
    }
}

impl CullingStrategy for FrustumCullingStrategy {
    fn evaluate(&self, node: &mut SceneNode, parent_mask: VisibilityMask, planes: &[Plane]) -> VisibilityMask {
        if !node.cullable.enable {
            node.cullable.visible = true;
            node.cullable.visibility_plane_mask = VisibilityMask::INDETERMINATE;
            return VisibilityMask::INDETERMINATE;
        }

        let Some(bounds) = node.render_bounds().copied() else {
            // Nothing to draw; children still get a full test of their own
            log::trace!("Node '{}' has no render bounds, hiding it", node.name());
            node.cullable.visible = false;
            node.cullable.visibility_plane_mask = VisibilityMask::INDETERMINATE;
            return VisibilityMask::INDETERMINATE;
        };

        let mask = compute_visibility_mask(&bounds, parent_mask, planes, self.shapes.is_2d(node.kind()));
        node.cullable.visibility_plane_mask = mask;
        node.cullable.visible = mask.is_visible();
        log::trace!("Node '{}' resolved to {:?}", node.name(), mask);
        mask
    }
}

#[cfg(test)]
thread_local! {
    /// Plane evaluations performed by [`compute_visibility_mask`] on this thread
    pub(crate) static PLANE_TESTS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Classify a box against a plane set, reusing the parent's result
///
/// Pure function of its inputs. The test threshold is exactly zero, so a
/// box touching a plane counts as inside it. A NaN distance is never
/// treated as outside: the plane stays marked as straddled and descendants
/// test it again.
///
/// Planes at indices past [`PlaneMask::CAPACITY`] have no mask bit. They are
/// tested whenever the parent is still intersecting, and if one of them is
/// straddled the node stays [`VisibilityMask::Intersecting`] even with no
/// tracked bits set.
#[allow(clippy::neg_cmp_op_on_partial_ord)] // NaN counts as straddling
pub fn compute_visibility_mask(
    aabb: &AABB,
    parent_mask: VisibilityMask,
    planes: &[Plane],
    is_2d: bool,
) -> VisibilityMask {
    let parent_planes = match parent_mask {
        VisibilityMask::Inside | VisibilityMask::Outside => return parent_mask,
        VisibilityMask::Intersecting(parent_planes) => parent_planes,
    };

    let mut mask = PlaneMask::empty();
    let mut untracked_straddle = false;

    for (k, plane) in planes.iter().enumerate() {
        if !parent_planes.needs_test(k) {
            continue;
        }
        if is_2d && is_depth_plane(k) {
            continue;
        }

        #[cfg(test)]
        PLANE_TESTS.with(|count| count.set(count.get() + 1));

        if plane.signed_distance(&aabb.positive_far_point(plane)) < 0.0 {
            return VisibilityMask::Outside;
        }
        if !(plane.signed_distance(&aabb.negative_far_point(plane)) >= 0.0) {
            match PlaneMask::for_plane(k) {
                Some(flag) => mask |= flag,
                None => untracked_straddle = true,
            }
        }
    }

    if untracked_straddle {
        VisibilityMask::Intersecting(mask)
    } else {
        VisibilityMask::from_planes(mask)
    }
}
