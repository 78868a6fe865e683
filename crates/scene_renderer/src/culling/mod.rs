//! Hierarchical visibility culling
//!
//! Each frame the [`CullingPass`] walks the scene graph top-down and asks its
//! [`CullingStrategy`] to resolve every node against the camera frustum. The
//! result is stored on the node's [`Cullable`](crate::scene::Cullable) for
//! the renderer to honor.
//!
//! ## Plane coherency
//!
//! A node's [`VisibilityMask`] records which frustum planes its bounds still
//! straddle. Children only re-test those planes; a parent that is entirely
//! inside or outside settles its whole subtree without any tests.

pub mod config;
pub mod mask;
pub mod pass;
pub mod strategy;


pub use config::{CullingConfig, ShapeClassification};
pub use mask::{PlaneMask, VisibilityMask};
pub use pass::{CullingPass, CullingStats};
pub use strategy::{compute_visibility_mask, CullingStrategy, FrustumCullingStrategy};
