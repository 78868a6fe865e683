//! # Camera
//!
//! Owns the view and projection transforms and the frustum derived from
//! them.
//!
//! ## Design Principles
//! - **Backend-agnostic**: Matrices follow the OpenGL clip convention; canvas,
//!   SVG and GPU backends adapt them as they need
//! - **Eager frustum**: Every mutation rebuilds the frustum, so readers never
//!   see planes that disagree with the matrices
//! - **Atomic replacement**: The frustum lives behind an `Arc` that is swapped,
//!   never edited, so a culling pass holding the old one is unaffected

use std::sync::Arc;

use crate::foundation::math::{Mat4, Mat4Ext, Vec3, utils};
use crate::scene::Frustum;

/// Projection model of a camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Perspective projection
    Perspective {
        /// Vertical field of view in radians
        fov_y: f32,
        /// Aspect ratio (width / height)
        aspect: f32,
        /// Distance to near clipping plane
        near: f32,
        /// Distance to far clipping plane
        far: f32,
    },
    /// Orthographic projection, bounds in view space
    Orthographic {
        /// Left bound
        left: f32,
        /// Right bound
        right: f32,
        /// Bottom bound
        bottom: f32,
        /// Top bound
        top: f32,
        /// Near bound
        near: f32,
        /// Far bound
        far: f32,
    },
}

impl Projection {
    /// Projection matrix for this model
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Self::Perspective { fov_y, aspect, near, far } => Mat4::perspective(fov_y, aspect, near, far),
            Self::Orthographic { left, right, bottom, top, near, far } => {
                Mat4::orthographic(left, right, bottom, top, near, far)
            }
        }
    }
}

/// Camera for perspective and orthographic projections
///
/// Uses a right-handed Y-up coordinate system in view space with the camera
/// looking down -Z.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    target: Vec3,
    up: Vec3,
    projection: Projection,
    /// Explicit view transform supplied by the transform system
    view_override: Option<Mat4>,
    frustum: Arc<Frustum>,
}

impl Camera {
    /// Create a new perspective camera looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    ///
    /// # Example
    /// ```rust
    /// use scene_renderer::foundation::math::Vec3;
    /// use scene_renderer::render::Camera;
    ///
    /// let camera = Camera::perspective(Vec3::new(0.0, 2.0, 5.0), 75.0, 16.0 / 9.0, 0.1, 100.0);
    /// assert!(camera.frustum().contains_point(&Vec3::zeros()));
    /// ```
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::with_projection(
            position,
            Projection::Perspective {
                fov_y: utils::deg_to_rad(fov_degrees),
                aspect,
                near,
                far,
            },
        )
    }

    /// Create a new orthographic camera looking at the origin
    pub fn orthographic(
        position: Vec3,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self::with_projection(position, Projection::Orthographic { left, right, bottom, top, near, far })
    }

    /// Create a camera at `position` looking at the origin with a given projection
    pub fn with_projection(position: Vec3, projection: Projection) -> Self {
        let mut camera = Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            projection,
            view_override: None,
            frustum: Arc::new(Frustum::default()),
        };
        camera.rebuild_frustum();
        camera
    }

    /// Camera position in world space
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Point the camera looks at
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Up vector
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Current projection model
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
        self.rebuild_frustum();
    }

    /// Update camera target (look-at point)
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        log::trace!("Camera target updated to: {:?}", target);
        self.rebuild_frustum();
    }

    /// Configure camera to look at a specific point with custom up vector
    ///
    /// The up vector doesn't need to be perpendicular to the view direction;
    /// the view matrix orthonormalizes it.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
        log::trace!("Camera look_at updated - target: {:?}, up: {:?}", target, up);
        self.rebuild_frustum();
    }

    /// Replace the projection model
    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
        self.rebuild_frustum();
    }

    /// Update camera aspect ratio for viewport changes
    ///
    /// Only perspective cameras have an aspect ratio; orthographic bounds are
    /// left untouched. Only changes larger than 0.01 are logged.
    pub fn set_aspect_ratio(&mut self, new_aspect: f32) {
        if let Projection::Perspective { ref mut aspect, .. } = self.projection {
            if (*aspect - new_aspect).abs() > 0.01 {
                log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", aspect, new_aspect);
            }
            *aspect = new_aspect;
            self.rebuild_frustum();
        }
    }

    /// Use an explicit view matrix instead of position/target/up
    ///
    /// Pass `None` to go back to the look-at view.
    pub fn set_view_matrix(&mut self, view: Option<Mat4>) {
        self.view_override = view;
        self.rebuild_frustum();
    }

    /// World-to-view transform
    pub fn view_matrix(&self) -> Mat4 {
        self.view_override
            .unwrap_or_else(|| Mat4::look_at(self.position, self.target, self.up))
    }

    /// View-to-clip transform
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix()
    }

    /// World-to-clip transform (`P × V`)
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Frustum for the current matrices
    ///
    /// The returned handle stays valid after the camera moves; it simply
    /// describes the old view.
    pub fn frustum(&self) -> Arc<Frustum> {
        Arc::clone(&self.frustum)
    }

    fn rebuild_frustum(&mut self) {
        let frustum = Frustum::from_view_projection(&self.view_projection_matrix());
        if frustum.is_degenerate() {
            log::warn!(
                "Degenerate camera frustum (position: {:?}, target: {:?}); culling falls back to permissive planes",
                self.position,
                self.target
            );
        }
        self.frustum = Arc::new(frustum);
    }
}

impl Default for Camera {
    /// Perspective camera above and behind the origin, looking at it
    ///
    /// - Position: (0, 3, 3)
    /// - FOV: 45 degrees
    /// - Aspect: 16:9
    /// - Near / far: 0.1 / 1000
    fn default() -> Self {
        Self::perspective(Vec3::new(0.0, 3.0, 3.0), 45.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}
