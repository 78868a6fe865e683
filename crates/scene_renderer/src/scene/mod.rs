//! Scene management
//!
//! The scene graph holds display objects with their world-space bounds; the
//! bounding primitives and the frustum describe what the camera can see.

mod bounds;
mod frustum;
mod scene_graph;

pub use bounds::{Plane, AABB};
pub use frustum::{is_depth_plane, Frustum, FrustumPlane, FRUSTUM_PLANE_COUNT};
pub use scene_graph::{Cullable, NodeId, SceneError, SceneGraph, SceneNode, ShapeKind};
