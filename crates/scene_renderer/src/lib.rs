//! # Scene Renderer
//!
//! Retained-mode scene graph with hierarchical frustum culling.
//!
//! ## Features
//!
//! - **Scene Graph**: Arena-backed tree of display objects with subtree bounds
//! - **Camera**: Perspective and orthographic projections with an eagerly
//!   rebuilt frustum
//! - **Culling**: Top-down visibility pass that reuses each parent's per-plane
//!   result and exempts 2D shapes from depth planes
//! - **Configuration**: TOML / RON culling settings
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_renderer::prelude::*;
//!
//! let mut scene = SceneGraph::new();
//! let root = scene.add_root("root", ShapeKind::Group);
//! let quad = scene.add_child(root, "quad", ShapeKind::Rect).unwrap();
//! scene
//!     .set_geometry_bounds(quad, Some(AABB::from_center_half_extents(Vec3::zeros(), Vec3::new(1.0, 1.0, 0.0))))
//!     .unwrap();
//! scene.update_render_bounds();
//!
//! let camera = Camera::perspective(Vec3::new(0.0, 0.0, 10.0), 45.0, 16.0 / 9.0, 0.1, 100.0);
//! let pass = CullingPass::default();
//! let stats = pass.run(&mut scene, &camera);
//!
//! assert_eq!(stats.visible(), 2);
//! assert!(scene.get(quad).unwrap().cullable.visible);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod scene;
pub mod render;
pub mod culling;

/// Common imports for renderer users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        culling::{CullingConfig, CullingPass, CullingStats, CullingStrategy, FrustumCullingStrategy, VisibilityMask},
        foundation::math::{Mat4, Vec3},
        render::{Camera, Projection},
        scene::{Frustum, FrustumPlane, NodeId, Plane, SceneError, SceneGraph, ShapeKind, AABB},
    };
}
